//! File output helpers.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to `path` by way of a temporary file in the same directory.
///
/// Readers never observe a partially written file: the temporary file is
/// renamed over `path` only after all bytes are flushed.
///
/// # Errors
///
/// Returns an IO error if the temporary file cannot be created, written, or
/// renamed into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
