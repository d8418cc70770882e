//! Loads the patient table from header-first comma-separated text.
//!
//! Column types, value ranges, and schemas are deliberately not validated
//! here; the only requirements are that the `patient_id` and `name` columns
//! exist and that no data row is wider than the header. Rows narrower than
//! the header keep their missing trailing fields empty.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::{PatientRecord, NAME_FIELD, PATIENT_ID_FIELD};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset has no header row")]
    Empty,

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {row} has {got} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// Read and parse a dataset file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<PatientRecord>, DatasetError> {
    let text = fs::read_to_string(path.as_ref())?;
    let records = parse_str(&text)?;
    tracing::info!(
        path = %path.as_ref().display(),
        patients = records.len(),
        "patient dataset loaded"
    );
    Ok(records)
}

/// Parse dataset text: one header line naming the columns, then one row per
/// line. Fields may be double-quoted to carry embedded commas, quotes
/// (doubled), or line breaks. Blank lines are skipped.
pub fn parse_str(text: &str) -> Result<Vec<PatientRecord>, DatasetError> {
    let mut rows = split_rows(text).into_iter();

    let header = rows.next().ok_or(DatasetError::Empty)?;
    for required in [PATIENT_ID_FIELD, NAME_FIELD] {
        if !header.iter().any(|column| column == required) {
            return Err(DatasetError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.len() > header.len() {
            return Err(DatasetError::RaggedRow {
                row: index + 1,
                got: row.len(),
                expected: header.len(),
            });
        }
        let mut values = row.into_iter();
        let fields = header
            .iter()
            .map(|column| (column.clone(), values.next().unwrap_or_default()))
            .collect();
        records.push(PatientRecord::new(fields));
    }
    Ok(records)
}

/// Split text into rows of fields, honoring double-quoted fields.
fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                // A lone empty field means the line was blank
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(std::mem::take(&mut row));
                }
                row.clear();
            }
            _ => field.push(ch),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}
