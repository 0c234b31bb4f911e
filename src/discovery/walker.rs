use std::ffi::OsString;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn, Span};

use crate::core::types::{AlignmentRecord, BAI_SUFFIX, BAM_SUFFIX};
use crate::utils::validation::{validate_field, validate_sample_name};

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read an entry of directory {}: {source}", .path.display())]
    Entry {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A directory entry with its type, as reported without following symlinks
struct DirEntry {
    path: PathBuf,
    file_type: FileType,
}

/// Lazy depth-first walk over a directory tree yielding BAM files.
///
/// Each directory is read (and sorted by file name) only when the walk
/// reaches it, so the output order is stable for a fixed directory state.
/// Symlinks to files are treated as files; symlinks to directories and other
/// special entries are never descended into.
///
/// A directory that cannot be read ends the walk with an error.
pub struct BamWalker {
    root: Option<PathBuf>,
    stack: Vec<std::vec::IntoIter<DirEntry>>,
    span: Span,
}

impl BamWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let span = tracing::debug_span!("discovery", root = %root.display());
        Self {
            root: Some(root),
            stack: Vec::new(),
            span,
        }
    }

    /// Emit discovery events under the given span instead of the default one
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn descend(&mut self, dir: &Path) -> Result<(), DiscoveryError> {
        let entries = read_sorted(dir)?;
        debug!(dir = %dir.display(), entries = entries.len(), "Reading directory");
        self.stack.push(entries.into_iter());
        Ok(())
    }

    fn fail(&mut self, err: DiscoveryError) -> Option<Result<AlignmentRecord, DiscoveryError>> {
        self.stack.clear();
        Some(Err(err))
    }
}

impl Iterator for BamWalker {
    type Item = Result<AlignmentRecord, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.span.clone();
        let _entered = span.enter();

        if let Some(root) = self.root.take() {
            if let Err(e) = self.descend(&root) {
                return self.fail(e);
            }
        }

        loop {
            let entry = match self.stack.last_mut()?.next() {
                Some(entry) => entry,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            if entry.file_type.is_dir() {
                if let Err(e) = self.descend(&entry.path) {
                    return self.fail(e);
                }
                continue;
            }

            if !is_regular_or_linked_file(&entry) {
                debug!(path = %entry.path.display(), "Skipping special entry");
                continue;
            }

            if let Some(record) = alignment_record(&entry.path) {
                return Some(Ok(record));
            }
        }
    }
}

/// Collect every BAM file below `root`.
///
/// # Errors
///
/// Returns `DiscoveryError` if any directory in the tree cannot be read.
pub fn find_bams(root: &Path) -> Result<Vec<AlignmentRecord>, DiscoveryError> {
    BamWalker::new(root).collect()
}

/// `{bam}.bai`, whether or not it exists
pub fn index_path(bam: &Path) -> PathBuf {
    let mut name = OsString::from(bam.as_os_str());
    name.push(BAI_SUFFIX);
    PathBuf::from(name)
}

fn read_sorted(dir: &Path) -> Result<Vec<DirEntry>, DiscoveryError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| DiscoveryError::Entry {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| DiscoveryError::Entry {
            path: dir.to_path_buf(),
            source,
        })?;
        entries.push(DirEntry {
            path: entry.path(),
            file_type,
        });
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}

fn is_regular_or_linked_file(entry: &DirEntry) -> bool {
    if entry.file_type.is_file() {
        return true;
    }
    if !entry.file_type.is_symlink() {
        return false;
    }
    // Follow the link for files only; linked directories could loop
    if entry.path.is_dir() {
        debug!(path = %entry.path.display(), "Not descending into linked directory");
        return false;
    }
    entry.path.is_file()
}

fn alignment_record(path: &Path) -> Option<AlignmentRecord> {
    let file_name = path.file_name()?;
    let Some(file_name) = file_name.to_str() else {
        warn!(path = %path.display(), "Skipping file with a non UTF-8 name");
        return None;
    };

    let sample = file_name.strip_suffix(BAM_SUFFIX)?;
    if let Err(e) = validate_sample_name(sample) {
        warn!(path = %path.display(), "Skipping BAM file: {e}");
        return None;
    }

    // The path ends up in a TSV cell verbatim; the index path only adds a suffix
    let Some(full) = path.to_str() else {
        warn!(path = %path.display(), "Skipping BAM file under a non UTF-8 directory");
        return None;
    };
    if let Err(e) = validate_field(full) {
        warn!(path = %path.display(), "Skipping BAM file: {e}");
        return None;
    }

    let mut record = AlignmentRecord::new(sample, path);
    let bai = index_path(path);
    if bai.is_file() {
        record = record.with_bai(bai);
    } else {
        debug!(bam = %path.display(), "No index found");
    }

    Some(record)
}
