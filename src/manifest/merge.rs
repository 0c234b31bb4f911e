use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn, Span};

use crate::manifest::table::Manifest;
use crate::parsing::tsv::{parse_tsv_text, ParseError};

/// Why a previous design table could not be used
#[derive(Error, Debug)]
pub enum ManifestLoadError {
    #[error("Previous design {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot read previous design {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Previous design {} is malformed: {source}", .path.display())]
    Malformed { path: PathBuf, source: ParseError },
}

/// Which samples survive a merge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep newly discovered samples only
    #[default]
    Left,
    /// Also keep samples found only in the previous design
    Outer,
}

/// Load a previous design table, classifying the failure.
///
/// # Errors
///
/// Returns `ManifestLoadError::NotFound` if nothing exists at `path`,
/// `ManifestLoadError::Unreadable` if it cannot be read, or
/// `ManifestLoadError::Malformed` if it is not a valid design table.
pub fn load_previous(path: &Path) -> Result<Manifest, ManifestLoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ManifestLoadError::NotFound(path.to_path_buf()));
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(ManifestLoadError::Malformed {
                path: path.to_path_buf(),
                source: ParseError::Io(e),
            });
        }
        Err(source) => {
            return Err(ManifestLoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_tsv_text(&content).map_err(|source| ManifestLoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Combines newly discovered samples with a previous design table.
///
/// New columns always win: previous columns whose names are already present
/// are not carried over. Depending on the [`MergePolicy`], samples found only
/// in the previous table are dropped or kept with empty new columns.
///
/// A previous table that is missing, unreadable or malformed is logged and the
/// new table is returned unchanged.
pub struct ManifestMerger {
    policy: MergePolicy,
    span: Span,
}

impl ManifestMerger {
    pub fn new() -> Self {
        Self {
            policy: MergePolicy::default(),
            span: tracing::debug_span!("merge"),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Emit merge events under the given span instead of the default one
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Merge `new` with the design table at `previous`, if any
    pub fn merge(&self, new: Manifest, previous: Option<&Path>) -> Manifest {
        let _entered = self.span.enter();

        let Some(path) = previous else {
            debug!("No previous design given");
            return new;
        };

        match load_previous(path) {
            Ok(previous) => {
                debug!(
                    path = %path.display(),
                    samples = previous.len(),
                    columns = previous.columns().len(),
                    "Loaded previous design"
                );
                self.join(new, &previous)
            }
            Err(e @ ManifestLoadError::NotFound(_)) => {
                info!("{e}, using discovered samples only");
                new
            }
            Err(e @ ManifestLoadError::Unreadable { .. }) => {
                warn!("{e}, using discovered samples only");
                new
            }
            Err(e @ ManifestLoadError::Malformed { .. }) => {
                warn!("{e}, using discovered samples only");
                new
            }
        }
    }

    /// Join `previous` onto `new` by sample name
    pub fn join(&self, new: Manifest, previous: &Manifest) -> Manifest {
        let _entered = self.span.enter();

        let mut carried = Vec::new();
        for (pos, column) in previous.columns().iter().enumerate() {
            if new.column_position(column).is_some() {
                debug!(column = %column, "Previous column replaced by discovered column");
            } else {
                carried.push((pos, column.clone()));
            }
        }

        let mut columns = new.columns().to_vec();
        columns.extend(carried.iter().map(|(_, name)| name.clone()));
        let mut merged = Manifest::new(new.index_name(), columns);

        let carry = |sample: &str| -> Vec<Option<String>> {
            let row = previous.row(sample);
            carried
                .iter()
                .map(|(pos, _)| row.and_then(|values| values.get(*pos).cloned().flatten()))
                .collect()
        };

        let mut matched = 0;
        for sample in new.samples() {
            if previous.contains_sample(sample) {
                matched += 1;
            }
            let mut values = new.row(sample).map(<[_]>::to_vec).unwrap_or_default();
            values.extend(carry(sample));
            merged.insert_row(sample, values);
        }

        let previous_only: Vec<&str> = previous
            .samples()
            .filter(|sample| !new.contains_sample(sample))
            .collect();

        match self.policy {
            MergePolicy::Left => {
                if !previous_only.is_empty() {
                    warn!(
                        count = previous_only.len(),
                        "Samples only in the previous design were dropped: {}",
                        previous_only.join(", ")
                    );
                }
            }
            MergePolicy::Outer => {
                for sample in &previous_only {
                    let mut values = vec![None; new.columns().len()];
                    values.extend(carry(sample));
                    merged.insert_row(*sample, values);
                }
                if !previous_only.is_empty() {
                    info!(
                        count = previous_only.len(),
                        "Kept samples found only in the previous design"
                    );
                }
            }
        }

        info!(
            samples = merged.len(),
            matched,
            carried_columns = carried.len(),
            "Merged previous design"
        );

        merged
    }
}

impl Default for ManifestMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge with the default left-join policy
pub fn merge(new: Manifest, previous: Option<&Path>) -> Manifest {
    ManifestMerger::new().merge(new, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LinkedSample, SampleFileMap};
    use tempfile::TempDir;

    fn discovered() -> Manifest {
        let mut map = SampleFileMap::new();
        map.insert(
            "S1",
            LinkedSample {
                bam: "/new/S1.bam".to_string(),
                bai: Some("/new/S1.bam.bai".to_string()),
            },
        );
        map.insert(
            "S2",
            LinkedSample {
                bam: "/new/S2.bam".to_string(),
                bai: None,
            },
        );
        Manifest::from_samples(&map)
    }

    fn write_previous(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("previous.tsv");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_merge_without_previous_is_identity() {
        assert_eq!(merge(discovered(), None), discovered());
    }

    #[test]
    fn test_merge_with_missing_previous_is_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.tsv");
        assert_eq!(merge(discovered(), Some(&path)), discovered());
    }

    #[test]
    fn test_merge_left_join() {
        let dir = TempDir::new().unwrap();
        let path = write_previous(
            &dir,
            "sample\tcondition\tbam\nS1\ttumor\t/old/S1.bam\nS3\tnormal\t/old/S3.bam\n",
        );

        let merged = merge(discovered(), Some(&path));
        assert_eq!(merged.columns(), ["bam", "bai", "condition"]);
        assert_eq!(merged.samples().collect::<Vec<_>>(), vec!["S1", "S2"]);

        // New columns win over previous ones
        assert_eq!(merged.get("S1", "bam"), Some("/new/S1.bam"));
        assert_eq!(merged.get("S1", "condition"), Some("tumor"));
        assert_eq!(merged.get("S2", "condition"), None);
        assert!(!merged.contains_sample("S3"));
    }

    #[test]
    fn test_merge_outer_keeps_previous_samples() {
        let dir = TempDir::new().unwrap();
        let path = write_previous(&dir, "sample\tcondition\nS1\ttumor\nS3\tnormal\n");

        let merged = ManifestMerger::new()
            .with_policy(MergePolicy::Outer)
            .merge(discovered(), Some(&path));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("S3", "condition"), Some("normal"));
        assert_eq!(merged.get("S3", "bam"), None);
        assert_eq!(merged.get("S1", "bam"), Some("/new/S1.bam"));
    }

    #[test]
    fn test_merge_malformed_previous_degrades() {
        let dir = TempDir::new().unwrap();
        let path = write_previous(&dir, "sample\ta\nS1\tx\ty\tz\n");
        assert_eq!(merge(discovered(), Some(&path)), discovered());
    }

    #[test]
    fn test_merge_empty_previous_degrades() {
        let dir = TempDir::new().unwrap();
        let path = write_previous(&dir, "");
        assert_eq!(merge(discovered(), Some(&path)), discovered());
    }

    #[test]
    fn test_merge_directory_as_previous_degrades() {
        let dir = TempDir::new().unwrap();
        assert_eq!(merge(discovered(), Some(dir.path())), discovered());
    }

    #[test]
    fn test_merge_is_idempotent_on_rerun() {
        let dir = TempDir::new().unwrap();
        let path = write_previous(&dir, "sample\tcondition\nS1\ttumor\n");

        let first = merge(discovered(), Some(&path));
        let rerun_path = write_previous(&dir, &first.to_tsv().unwrap());
        let second = merge(discovered(), Some(&rerun_path));
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_previous_classification() {
        let dir = TempDir::new().unwrap();

        let missing = load_previous(&dir.path().join("missing.tsv"));
        assert!(matches!(missing, Err(ManifestLoadError::NotFound(_))));

        let malformed = write_previous(&dir, "sample\ta\ta\n");
        assert!(matches!(
            load_previous(&malformed),
            Err(ManifestLoadError::Malformed { .. })
        ));

        let binary = dir.path().join("binary.tsv");
        std::fs::write(&binary, [0xff, 0xfe, 0x00, 0x9f]).unwrap();
        assert!(matches!(
            load_previous(&binary),
            Err(ManifestLoadError::Malformed { .. })
        ));

        assert!(matches!(
            load_previous(dir.path()),
            Err(ManifestLoadError::Unreadable { .. })
        ));
    }
}
