use std::collections::BTreeSet;
use std::io::Read;
use std::str::FromStr;

use csv::StringRecord;

use super::normalizer::{non_blank, normalize_header};
use super::ImportError;
use crate::workflows::performance::{
    Criterion, CriterionCategory, CriterionKey, CriterionType, EvaluationRecord,
};

const CRITERIA_COLUMNS: [&str; 5] = ["key", "name", "type", "weight", "category"];
const EMPLOYEE_ID_COLUMN: &str = "employee_id";
const EMPLOYEE_NAME_COLUMN: &str = "employee_name";

fn reader_for<R: Read>(reader: R) -> Result<(csv::Reader<R>, Vec<String>), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();
    Ok((csv_reader, headers))
}

fn column_index(headers: &[String], column: &'static str) -> Result<usize, ImportError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or(ImportError::MissingColumn(column))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or(0)
}

pub(crate) fn parse_criteria<R: Read>(reader: R) -> Result<Vec<Criterion>, ImportError> {
    let (mut csv_reader, headers) = reader_for(reader)?;
    let mut indices = [0usize; 5];
    for (slot, column) in indices.iter_mut().zip(CRITERIA_COLUMNS) {
        *slot = column_index(&headers, column)?;
    }
    let [key_at, name_at, type_at, weight_at, category_at] = indices;

    let mut criteria = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = line_of(&record);
        let cell = |index: usize| record.get(index).and_then(non_blank);

        let raw_key = cell(key_at).ok_or_else(|| ImportError::InvalidCriterion {
            line,
            detail: "missing criterion key".to_string(),
        })?;
        let key = CriterionKey::from_str(raw_key).map_err(|_| ImportError::UnknownCriterion {
            column: raw_key.to_string(),
        })?;

        let criterion_type = match cell(type_at) {
            Some(value) => CriterionType::parse(value).ok_or_else(|| ImportError::InvalidCriterion {
                line,
                detail: format!("unknown criterion type '{value}'"),
            })?,
            None => key.canonical_type(),
        };
        let category = match cell(category_at) {
            Some(value) => {
                CriterionCategory::parse(value).ok_or_else(|| ImportError::InvalidCriterion {
                    line,
                    detail: format!("unknown category '{value}'"),
                })?
            }
            None => key.category(),
        };
        let weight = match cell(weight_at) {
            Some(value) => parse_number(value, line, "weight")?,
            None => {
                return Err(ImportError::InvalidCriterion {
                    line,
                    detail: format!("criterion {key} has no weight"),
                })
            }
        };
        let name = cell(name_at)
            .map(str::to_string)
            .unwrap_or_else(|| key.label().to_string());

        criteria.push(Criterion {
            key,
            name,
            criterion_type,
            weight,
            category,
        });
    }

    Ok(criteria)
}

pub(crate) fn parse_evaluations<R: Read>(reader: R) -> Result<Vec<EvaluationRecord>, ImportError> {
    let (mut csv_reader, headers) = reader_for(reader)?;
    let id_at = column_index(&headers, EMPLOYEE_ID_COLUMN)?;
    let name_at = column_index(&headers, EMPLOYEE_NAME_COLUMN)?;

    let mut value_columns = Vec::new();
    let mut seen = BTreeSet::new();
    for (index, header) in headers.iter().enumerate() {
        if index == id_at || index == name_at {
            continue;
        }
        let key = CriterionKey::from_str(header).map_err(|_| ImportError::UnknownCriterion {
            column: header.clone(),
        })?;
        // Two spellings of one criterion would let the later cell mask the earlier one.
        if !seen.insert(key) {
            return Err(ImportError::DuplicateColumn {
                column: header.clone(),
            });
        }
        value_columns.push((index, key));
    }

    let mut evaluations = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = line_of(&record);
        let employee_id = record.get(id_at).unwrap_or_default();
        let employee_name = record.get(name_at).unwrap_or_default();

        let mut evaluation = EvaluationRecord::new(employee_id, employee_name);
        for (index, key) in &value_columns {
            if let Some(value) = record.get(*index).and_then(non_blank) {
                let parsed = parse_number(value, line, key.as_str())?;
                evaluation.values.insert(*key, parsed);
            }
        }
        evaluations.push(evaluation);
    }

    Ok(evaluations)
}

fn parse_number(value: &str, line: u64, column: &str) -> Result<f64, ImportError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| ImportError::InvalidValue {
            line,
            column: column.to_string(),
            value: value.to_string(),
        })
}
