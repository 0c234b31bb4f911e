use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::types::SampleFileMap;
use crate::utils::fs::write_atomic;
use crate::utils::validation::{validate_field, ValidationError};

/// Header of the index column in written design tables
pub const SAMPLE_COLUMN: &str = "sample";

/// Column holding the BAM path
pub const BAM_COLUMN: &str = "bam";

/// Column holding the BAM index path
pub const BAI_COLUMN: &str = "bai";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Cannot write value for sample '{sample}': {source}")]
    InvalidField {
        sample: String,
        source: ValidationError,
    },

    #[error("Failed to write design table: {0}")]
    Io(#[from] std::io::Error),
}

/// A table of optional string values indexed by sample name.
///
/// Rows are kept sorted by sample name and always have one value per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    index_name: String,
    columns: Vec<String>,
    rows: BTreeMap<String, Vec<Option<String>>>,
}

impl Manifest {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            rows: BTreeMap::new(),
        }
    }

    /// Build the table of newly discovered samples: `sample`, `bam`, `bai`
    pub fn from_samples(samples: &SampleFileMap) -> Self {
        let mut table = Self::new(
            SAMPLE_COLUMN,
            vec![BAM_COLUMN.to_string(), BAI_COLUMN.to_string()],
        );
        for (sample, linked) in samples.iter() {
            table.insert_row(sample, vec![Some(linked.bam.clone()), linked.bai.clone()]);
        }
        table
    }

    /// Insert or replace a row, returning the replaced values.
    ///
    /// Missing trailing values are padded; extra values are dropped.
    pub fn insert_row(
        &mut self,
        sample: impl Into<String>,
        mut values: Vec<Option<String>>,
    ) -> Option<Vec<Option<String>>> {
        values.resize(self.columns.len(), None);
        self.rows.insert(sample.into(), values)
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn contains_sample(&self, sample: &str) -> bool {
        self.rows.contains_key(sample)
    }

    pub fn row(&self, sample: &str) -> Option<&[Option<String>]> {
        self.rows.get(sample).map(Vec::as_slice)
    }

    /// Value of one cell, `None` if the sample, the column, or the value is missing
    pub fn get(&self, sample: &str, column: &str) -> Option<&str> {
        let pos = self.column_position(column)?;
        self.rows.get(sample)?.get(pos)?.as_deref()
    }

    /// Sample names in row order
    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Values of one column in row order, `None` if there is no such column
    pub fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        let pos = self.column_position(column)?;
        Some(
            self.rows
                .values()
                .map(|values| values.get(pos).and_then(|v| v.as_deref()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as tab-separated text with a header row. Missing values are empty cells.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidField` if a name or value contains a tab
    /// or a line break.
    pub fn to_tsv(&self) -> Result<String, ManifestError> {
        let check = |sample: &str, value: &str| {
            validate_field(value).map_err(|source| ManifestError::InvalidField {
                sample: sample.to_string(),
                source,
            })
        };

        let mut out = String::new();

        check(&self.index_name, &self.index_name)?;
        out.push_str(&self.index_name);
        for column in &self.columns {
            check(&self.index_name, column)?;
            out.push('\t');
            out.push_str(column);
        }
        out.push('\n');

        for (sample, values) in &self.rows {
            check(sample, sample)?;
            out.push_str(sample);
            for value in values {
                out.push('\t');
                if let Some(value) = value {
                    check(sample, value)?;
                    out.push_str(value);
                }
            }
            out.push('\n');
        }

        Ok(out)
    }

    /// Write the table to `path` as TSV, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` if the table cannot be rendered or written.
    pub fn write_tsv(&self, path: &Path) -> Result<(), ManifestError> {
        let text = self.to_tsv()?;
        write_atomic(path, text.as_bytes())?;
        Ok(())
    }
}
