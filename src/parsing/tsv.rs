use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::manifest::table::Manifest;
use crate::utils::validation::{check_row_limit, MAX_MANIFEST_ROWS};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid design table: {0}")]
    InvalidFormat(String),

    #[error("Too many rows: {0} exceeds maximum allowed ({MAX_MANIFEST_ROWS})")]
    TooManyRows(usize),
}

/// Parse a tab-separated design table file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_tsv_file(path: &Path) -> Result<Manifest, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_tsv_text(&content)
}

/// Parse tab-separated text with a header row, indexed by the first column.
///
/// Blank lines are skipped. Empty cells are read as missing values, and rows
/// shorter than the header are padded with missing values. A sample name seen
/// twice keeps its last row.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if there is no header, a column name is
/// empty or repeated, a row has more fields than the header or an empty sample
/// name, or `ParseError::TooManyRows` if the limit is exceeded.
pub fn parse_tsv_text(text: &str) -> Result<Manifest, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(ParseError::InvalidFormat("Missing header row".to_string()));
    };

    let mut header_fields = header.split('\t');
    // The index column may be unnamed
    let index_name = header_fields.next().unwrap_or_default().to_string();
    let columns: Vec<String> = header_fields.map(str::to_string).collect();

    let mut seen = HashSet::new();
    for column in &columns {
        if column.is_empty() {
            return Err(ParseError::InvalidFormat(
                "Header contains an empty column name".to_string(),
            ));
        }
        if !seen.insert(column.as_str()) {
            return Err(ParseError::InvalidFormat(format!(
                "Column '{column}' appears more than once"
            )));
        }
    }

    let mut table = Manifest::new(index_name, columns);
    let mut rows = 0;

    for (line_num, line) in lines {
        let mut fields = line.split('\t');
        let sample = fields.next().unwrap_or_default();
        if sample.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has an empty sample name"
            )));
        }

        let values: Vec<Option<String>> = fields
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        if values.len() > table.columns().len() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields, header has {}",
                values.len() + 1,
                table.columns().len() + 1
            )));
        }

        // Check row limit for DOS protection
        if check_row_limit(rows).is_some() {
            return Err(ParseError::TooManyRows(rows));
        }
        rows += 1;

        if table.insert_row(sample, values).is_some() {
            warn!(sample, line = line_num, "Duplicate sample in design table, keeping the last row");
        }
    }

    Ok(table)
}
