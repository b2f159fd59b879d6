use serde::{Deserialize, Serialize};

/// Top of the supervisor rating scale; also the factor that maps an aggregate back onto it.
pub const RATING_SCALE: f64 = 5.0;
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;
/// Ratings at or above this are retained and flagged for promotion.
pub const PROMOTION_RATING: f64 = 4.0;
/// Ratings at or above this are retained.
pub const RETENTION_RATING: f64 = 3.0;
/// Absences strictly above this force termination.
pub const DEFAULT_ABSENCE_OVERRIDE_THRESHOLD: u32 = 10;
/// Multiplier applied to 1–5 ratings before column-max scaling (1–5 becomes 20–100).
pub const COLUMN_MAX_SCALE_FACTOR: f64 = 20.0;
pub const PROMOTION_NOTE: &str = "Promotion candidate";

/// Normalization applied to the six performance ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRule {
    /// `raw / 5`; independent of who else is in the cohort.
    #[default]
    OverFive,
    /// `raw * 20` divided by the column's maximum.
    ColumnMax,
}

impl PerformanceRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OverFive => "over_five",
            Self::ColumnMax => "column_max",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "over_five" => Some(Self::OverFive),
            "column_max" => Some(Self::ColumnMax),
            _ => None,
        }
    }
}

/// Normalization applied to lateness, permitted leave, sick days and early departures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceRule {
    /// Any occurrence scores 0, none scores 1.
    #[default]
    AnyOccurrence,
    /// Occurrences earn `min(nonzero column values) / raw`.
    MinOverValue,
}

impl AttendanceRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnyOccurrence => "any_occurrence",
            Self::MinOverValue => "min_over_value",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "any_occurrence" => Some(Self::AnyOccurrence),
            "min_over_value" => Some(Self::MinOverValue),
            _ => None,
        }
    }
}

/// How the [0,1] aggregate is mapped back onto the 1–5 rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingConversion {
    /// `clamp(round(score * 5), 1, 5)`.
    #[default]
    Rounded,
    /// `clamp(score * 5, 1, 5)`.
    Continuous,
}

impl RatingConversion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rounded => "rounded",
            Self::Continuous => "continuous",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rounded" => Some(Self::Rounded),
            "continuous" => Some(Self::Continuous),
            _ => None,
        }
    }

    pub fn convert(self, final_score: f64) -> f64 {
        let scaled = final_score * RATING_SCALE;
        let rating = match self {
            Self::Rounded => scaled.round(),
            Self::Continuous => scaled,
        };
        rating.clamp(MIN_RATING, MAX_RATING)
    }
}

/// Knobs for the behavioral forks of the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOptions {
    #[serde(default)]
    pub performance_rule: PerformanceRule,
    #[serde(default)]
    pub attendance_rule: AttendanceRule,
    #[serde(default)]
    pub rating_conversion: RatingConversion,
    #[serde(default = "default_absence_override_threshold")]
    pub absence_override_threshold: u32,
}

fn default_absence_override_threshold() -> u32 {
    DEFAULT_ABSENCE_OVERRIDE_THRESHOLD
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            performance_rule: PerformanceRule::default(),
            attendance_rule: AttendanceRule::default(),
            rating_conversion: RatingConversion::default(),
            absence_override_threshold: DEFAULT_ABSENCE_OVERRIDE_THRESHOLD,
        }
    }
}
