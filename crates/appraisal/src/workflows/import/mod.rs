//! CSV import of criteria tables and employee evaluation sheets.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::performance::{CriteriaCatalog, CriteriaError, EvaluationRecord};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    UnknownCriterion { column: String },
    DuplicateColumn { column: String },
    InvalidCriterion { line: u64, detail: String },
    InvalidValue { line: u64, column: String, value: String },
    Criteria(CriteriaError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read CSV file: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::MissingColumn(column) => {
                write!(f, "CSV header is missing required column '{}'", column)
            }
            ImportError::UnknownCriterion { column } => {
                write!(f, "'{}' is not a known appraisal criterion", column)
            }
            ImportError::DuplicateColumn { column } => {
                write!(f, "column '{}' names a criterion that appears twice", column)
            }
            ImportError::InvalidCriterion { line, detail } => {
                write!(f, "invalid criterion on line {}: {}", line, detail)
            }
            ImportError::InvalidValue {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: value '{}' in column '{}' is not a number",
                line, value, column
            ),
            ImportError::Criteria(err) => write!(f, "invalid criteria table: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Criteria(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<CriteriaError> for ImportError {
    fn from(err: CriteriaError) -> Self {
        Self::Criteria(err)
    }
}

/// Reads a `key,name,type,weight,category` table. Blank type, name or category cells fall
/// back to the key's canonical values.
pub struct CriteriaImporter;

impl CriteriaImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CriteriaCatalog, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CriteriaCatalog, ImportError> {
        let criteria = parser::parse_criteria(reader)?;
        let catalog = CriteriaCatalog::from_criteria(criteria)?;
        Ok(catalog)
    }
}

/// Reads an `employee_id,employee_name,<criterion keys...>` sheet. Blank cells stay unset.
pub struct EvaluationImporter;

impl EvaluationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EvaluationRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<EvaluationRecord>, ImportError> {
        parser::parse_evaluations(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::performance::{CriterionCategory, CriterionKey, CriterionType};
    use std::io::Cursor;

    #[test]
    fn normalize_header_folds_case_and_separators() {
        assert_eq!(
            normalizer::normalize_for_tests("\u{feff}Task  Understanding"),
            "task_understanding"
        );
        assert_eq!(
            normalizer::normalize_for_tests("Early-Departure-Count"),
            "early_departure_count"
        );
    }

    #[test]
    fn criteria_rows_fall_back_to_canonical_metadata() {
        let csv = "key,name,type,weight,category\n\
quality,Work Quality,benefit,60,performance\n\
sick-days,,,25,\n\
warning_letter_flag,Warning,cost,15,conduct\n";

        let catalog = CriteriaImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(catalog.len(), 3);
        let sick = catalog.get(CriterionKey::SickDays).expect("sick days");
        assert_eq!(sick.name, "Sick Days");
        assert_eq!(sick.criterion_type, CriterionType::Cost);
        assert_eq!(sick.category, CriterionCategory::Attendance);
        assert_eq!(catalog.get(CriterionKey::Quality).expect("quality").name, "Work Quality");
        catalog.validate().expect("balanced");
    }

    #[test]
    fn criteria_import_rejects_duplicates_and_bad_rows() {
        let duplicate = "key,name,type,weight,category\nquality,,,30,\nQuality,,,30,\n";
        match CriteriaImporter::from_reader(Cursor::new(duplicate)) {
            Err(ImportError::Criteria(CriteriaError::DuplicateKey(CriterionKey::Quality))) => {}
            other => panic!("expected duplicate key, got {other:?}"),
        }

        let bad_type = "key,name,type,weight,category\nquality,,gain,60,\n";
        assert!(matches!(
            CriteriaImporter::from_reader(Cursor::new(bad_type)),
            Err(ImportError::InvalidCriterion { line: 2, .. })
        ));

        let bad_weight = "key,name,type,weight,category\nquality,,,sixty,\n";
        assert!(matches!(
            CriteriaImporter::from_reader(Cursor::new(bad_weight)),
            Err(ImportError::InvalidValue { .. })
        ));

        let missing = "key,name,weight\nquality,,60\n";
        assert!(matches!(
            CriteriaImporter::from_reader(Cursor::new(missing)),
            Err(ImportError::MissingColumn("type"))
        ));
    }

    #[test]
    fn evaluation_sheet_maps_columns_to_criteria() {
        let csv = "Employee ID,Employee Name,Quality,Absence Days,achievement_flag\n\
E-1,Dana,5,,1\n\
E-2,Lee,3,12,0\n";

        let evaluations =
            EvaluationImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(evaluations.len(), 2);
        assert_eq!(evaluations[0].employee_id.0, "E-1");
        assert_eq!(evaluations[0].value(CriterionKey::Quality), 5.0);
        assert!(!evaluations[0].values.contains_key(&CriterionKey::AbsenceDays));
        assert_eq!(evaluations[1].value(CriterionKey::AbsenceDays), 12.0);
    }

    #[test]
    fn evaluation_sheet_rejects_unknown_columns_and_text_values() {
        let unknown = "employee_id,employee_name,overtime\nE-1,Dana,3\n";
        match EvaluationImporter::from_reader(Cursor::new(unknown)) {
            Err(ImportError::UnknownCriterion { column }) => assert_eq!(column, "overtime"),
            other => panic!("expected unknown criterion, got {other:?}"),
        }

        let text = "employee_id,employee_name,quality\nE-1,Dana,excellent\n";
        match EvaluationImporter::from_reader(Cursor::new(text)) {
            Err(ImportError::InvalidValue {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "quality");
                assert_eq!(value, "excellent");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn evaluation_sheet_rejects_two_spellings_of_one_criterion() {
        let csv = "employee_id,employee_name,absence_days,Absence Days\nE-1,Dana,12,0\n";
        match EvaluationImporter::from_reader(Cursor::new(csv)) {
            Err(ImportError::DuplicateColumn { column }) => assert_eq!(column, "absence_days"),
            other => panic!("expected duplicate column, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = EvaluationImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
