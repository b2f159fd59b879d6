use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::performance::scoring::DEFAULT_ABSENCE_OVERRIDE_THRESHOLD;
use crate::workflows::performance::{
    AttendanceRule, PerformanceRule, RatingConversion, ScoringOptions,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringOptions,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: scoring_from_env()?,
        })
    }
}

fn scoring_from_env() -> Result<ScoringOptions, ConfigError> {
    let performance_rule = match env::var("APPRAISAL_PERFORMANCE_RULE") {
        Ok(value) => PerformanceRule::parse(&value).ok_or(ConfigError::InvalidScoringOption {
            variable: "APPRAISAL_PERFORMANCE_RULE",
            value,
        })?,
        Err(_) => PerformanceRule::default(),
    };

    let attendance_rule = match env::var("APPRAISAL_ATTENDANCE_RULE") {
        Ok(value) => AttendanceRule::parse(&value).ok_or(ConfigError::InvalidScoringOption {
            variable: "APPRAISAL_ATTENDANCE_RULE",
            value,
        })?,
        Err(_) => AttendanceRule::default(),
    };

    let rating_conversion = match env::var("APPRAISAL_RATING_CONVERSION") {
        Ok(value) => RatingConversion::parse(&value).ok_or(ConfigError::InvalidScoringOption {
            variable: "APPRAISAL_RATING_CONVERSION",
            value,
        })?,
        Err(_) => RatingConversion::default(),
    };

    let absence_override_threshold = match env::var("APPRAISAL_ABSENCE_THRESHOLD") {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidAbsenceThreshold { value })?,
        Err(_) => DEFAULT_ABSENCE_OVERRIDE_THRESHOLD,
    };

    Ok(ScoringOptions {
        performance_rule,
        attendance_rule,
        rating_conversion,
        absence_override_threshold,
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScoringOption { variable: &'static str, value: String },
    InvalidAbsenceThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScoringOption { variable, value } => {
                write!(f, "{} has unsupported value '{}'", variable, value)
            }
            ConfigError::InvalidAbsenceThreshold { value } => write!(
                f,
                "APPRAISAL_ABSENCE_THRESHOLD must be a whole number of days, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidScoringOption { .. }
            | ConfigError::InvalidAbsenceThreshold { .. } => None,
        }
    }
}
