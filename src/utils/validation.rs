//! Centralized validation and helper functions.

/// Maximum number of rows read from a design table (DOS protection)
pub const MAX_MANIFEST_ROWS: usize = 1_000_000;

/// Field-level validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty sample name")]
    EmptySampleName,
    #[error("Value contains a tab or line break: {0:?}")]
    ControlCharacter(String),
}

/// Check that a value can be stored in a single tab-separated cell.
///
/// # Errors
///
/// Returns `ValidationError::ControlCharacter` if the value contains a tab,
/// a carriage return or a newline.
pub fn validate_field(value: &str) -> Result<(), ValidationError> {
    if value.contains(['\t', '\n', '\r']) {
        return Err(ValidationError::ControlCharacter(value.to_string()));
    }
    Ok(())
}

/// Check that a sample name is usable as a design table index.
///
/// # Errors
///
/// Returns `ValidationError::EmptySampleName` for an empty or blank name, or
/// `ValidationError::ControlCharacter` if the name cannot sit in a TSV cell.
///
/// # Examples
///
/// ```
/// use bam_design::utils::validation::validate_sample_name;
///
/// assert!(validate_sample_name("S1").is_ok());
/// assert!(validate_sample_name("").is_err());
/// assert!(validate_sample_name("S\t1").is_err());
/// ```
pub fn validate_sample_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptySampleName);
    }
    validate_field(name)
}

/// Check if reading another row would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_row_limit(count: usize) -> Option<String> {
    if count >= MAX_MANIFEST_ROWS {
        Some(format!(
            "Too many rows: adding another would exceed maximum of {MAX_MANIFEST_ROWS}"
        ))
    } else {
        None
    }
}
