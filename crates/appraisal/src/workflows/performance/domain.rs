use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identifier for one of the thirteen appraisal criteria.
///
/// Declaration order is the canonical column order of every decision matrix, so the derived
/// `Ord` doubles as the canonical ordering when keys live in a `BTreeMap`.
/// Deserialization goes through [`FromStr`], so payload keys accept the same spellings as CSV
/// headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CriterionKey {
    Quality,
    Responsibility,
    Quantity,
    TaskUnderstanding,
    Initiative,
    Cooperation,
    AbsenceDays,
    LatenessCount,
    PermittedLeaveDays,
    SickDays,
    EarlyDepartureCount,
    AchievementFlag,
    WarningLetterFlag,
}

impl CriterionKey {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::Quality,
            Self::Responsibility,
            Self::Quantity,
            Self::TaskUnderstanding,
            Self::Initiative,
            Self::Cooperation,
            Self::AbsenceDays,
            Self::LatenessCount,
            Self::PermittedLeaveDays,
            Self::SickDays,
            Self::EarlyDepartureCount,
            Self::AchievementFlag,
            Self::WarningLetterFlag,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Responsibility => "responsibility",
            Self::Quantity => "quantity",
            Self::TaskUnderstanding => "task_understanding",
            Self::Initiative => "initiative",
            Self::Cooperation => "cooperation",
            Self::AbsenceDays => "absence_days",
            Self::LatenessCount => "lateness_count",
            Self::PermittedLeaveDays => "permitted_leave_days",
            Self::SickDays => "sick_days",
            Self::EarlyDepartureCount => "early_departure_count",
            Self::AchievementFlag => "achievement_flag",
            Self::WarningLetterFlag => "warning_letter_flag",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Quality => "Quality of Work",
            Self::Responsibility => "Responsibility",
            Self::Quantity => "Quantity of Work",
            Self::TaskUnderstanding => "Task Understanding",
            Self::Initiative => "Initiative",
            Self::Cooperation => "Cooperation",
            Self::AbsenceDays => "Unexcused Absences",
            Self::LatenessCount => "Lateness",
            Self::PermittedLeaveDays => "Permitted Leave",
            Self::SickDays => "Sick Days",
            Self::EarlyDepartureCount => "Early Departures",
            Self::AchievementFlag => "Notable Achievement",
            Self::WarningLetterFlag => "Warning Letter",
        }
    }

    pub const fn canonical_type(self) -> CriterionType {
        match self {
            Self::Quality
            | Self::Responsibility
            | Self::Quantity
            | Self::TaskUnderstanding
            | Self::Initiative
            | Self::Cooperation
            | Self::AchievementFlag => CriterionType::Benefit,
            Self::AbsenceDays
            | Self::LatenessCount
            | Self::PermittedLeaveDays
            | Self::SickDays
            | Self::EarlyDepartureCount
            | Self::WarningLetterFlag => CriterionType::Cost,
        }
    }

    pub const fn category(self) -> CriterionCategory {
        match self {
            Self::Quality
            | Self::Responsibility
            | Self::Quantity
            | Self::TaskUnderstanding
            | Self::Initiative
            | Self::Cooperation => CriterionCategory::Performance,
            Self::AbsenceDays
            | Self::LatenessCount
            | Self::PermittedLeaveDays
            | Self::SickDays
            | Self::EarlyDepartureCount => CriterionCategory::Attendance,
            Self::AchievementFlag | Self::WarningLetterFlag => CriterionCategory::Conduct,
        }
    }

    /// The six 1–5 supervisor ratings.
    pub const fn is_performance_rating(self) -> bool {
        matches!(self.category(), CriterionCategory::Performance)
    }

    /// Attendance deficiencies other than unexcused absence.
    pub const fn is_attendance_deficiency(self) -> bool {
        matches!(
            self,
            Self::LatenessCount
                | Self::PermittedLeaveDays
                | Self::SickDays
                | Self::EarlyDepartureCount
        )
    }
}

impl fmt::Display for CriterionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name one of the canonical criteria.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown criterion key '{0}'")]
pub struct UnknownCriterionKey(pub String);

impl FromStr for CriterionKey {
    type Err = UnknownCriterionKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| UnknownCriterionKey(value.to_string()))
    }
}

impl TryFrom<String> for CriterionKey {
    type Error = UnknownCriterionKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Direction of a criterion: benefits reward high raw values, costs reward low ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionType {
    Benefit,
    Cost,
}

impl CriterionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Benefit => "Benefit",
            Self::Cost => "Cost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "benefit" => Some(Self::Benefit),
            "cost" => Some(Self::Cost),
            _ => None,
        }
    }
}

/// Fixed weight buckets. Weights of the criteria inside a bucket sum to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionCategory {
    Performance,
    Attendance,
    Conduct,
}

impl CriterionCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Performance, Self::Attendance, Self::Conduct]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Performance => "Performance",
            Self::Attendance => "Attendance",
            Self::Conduct => "Conduct",
        }
    }

    /// Fixed subtotal in percentage points.
    pub const fn target_weight(self) -> f64 {
        match self {
            Self::Performance => 60.0,
            Self::Attendance => 25.0,
            Self::Conduct => 15.0,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "performance" => Some(Self::Performance),
            "attendance" => Some(Self::Attendance),
            "conduct" => Some(Self::Conduct),
            _ => None,
        }
    }
}

/// Weighted, typed criterion as maintained by the criteria catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub key: CriterionKey,
    pub name: String,
    #[serde(rename = "type")]
    pub criterion_type: CriterionType,
    /// Percentage points, 0–100.
    pub weight: f64,
    pub category: CriterionCategory,
}

impl Criterion {
    /// Criterion using the key's canonical label, type and category.
    pub fn standard(key: CriterionKey, weight: f64) -> Self {
        Self {
            key,
            name: key.label().to_string(),
            criterion_type: key.canonical_type(),
            weight,
            category: key.category(),
        }
    }

    pub fn weight_fraction(&self) -> f64 {
        self.weight / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw evaluation inputs for one employee, keyed by criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    #[serde(default)]
    pub values: BTreeMap<CriterionKey, f64>,
}

impl EvaluationRecord {
    pub fn new(employee_id: impl Into<String>, employee_name: impl Into<String>) -> Self {
        Self {
            employee_id: EmployeeId(employee_id.into()),
            employee_name: employee_name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: CriterionKey, value: f64) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Raw value for `key`; criteria that were never recorded read as zero.
    pub fn value(&self, key: CriterionKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }
}
