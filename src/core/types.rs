use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Suffix identifying an alignment file
pub const BAM_SUFFIX: &str = ".bam";

/// Suffix appended to the full alignment filename to locate its index
pub const BAI_SUFFIX: &str = ".bai";

/// Directory holding the packaged reference artifacts
pub const GENOMES_DIR: &str = "genomes";

/// A BAM file found during directory traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    /// Sample name, the BAM filename without its `.bam` suffix
    pub sample: String,

    /// Path to the BAM file
    pub bam: PathBuf,

    /// Path to `{bam}.bai`, present only if that file exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bai: Option<PathBuf>,
}

impl AlignmentRecord {
    pub fn new(sample: impl Into<String>, bam: impl Into<PathBuf>) -> Self {
        Self {
            sample: sample.into(),
            bam: bam.into(),
            bai: None,
        }
    }

    #[must_use]
    pub fn with_bai(mut self, bai: impl Into<PathBuf>) -> Self {
        self.bai = Some(bai.into());
        self
    }
}

/// Source files linked for one sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedSample {
    pub bam: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bai: Option<String>,
}

/// Link names mapped to source paths.
///
/// Entries are stored per sample so an index can only exist next to its BAM.
/// [`SampleFileMap::to_link_map`] flattens them into `{sample}.bam` and
/// `{sample}.bam.bai` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFileMap {
    samples: BTreeMap<String, LinkedSample>,
}

impl SampleFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample, returning the entry it replaced
    pub fn insert(&mut self, sample: impl Into<String>, linked: LinkedSample) -> Option<LinkedSample> {
        self.samples.insert(sample.into(), linked)
    }

    pub fn get(&self, sample: &str) -> Option<&LinkedSample> {
        self.samples.get(sample)
    }

    pub fn contains_sample(&self, sample: &str) -> bool {
        self.samples.contains_key(sample)
    }

    /// Iterate over samples in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinkedSample)> {
        self.samples.iter().map(|(name, linked)| (name.as_str(), linked))
    }

    /// Number of samples (not link entries)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Flatten into `{sample}.bam -> path` and `{sample}.bam.bai -> path` entries
    pub fn to_link_map(&self) -> BTreeMap<String, String> {
        let mut links = BTreeMap::new();
        for (sample, linked) in &self.samples {
            links.insert(bam_link_name(sample), linked.bam.clone());
            if let Some(bai) = &linked.bai {
                links.insert(bai_link_name(sample), bai.clone());
            }
        }
        links
    }
}

/// `{sample}.bam`
pub fn bam_link_name(sample: &str) -> String {
    format!("{sample}{BAM_SUFFIX}")
}

/// `{sample}.bam.bai`
pub fn bai_link_name(sample: &str) -> String {
    format!("{sample}{BAM_SUFFIX}{BAI_SUFFIX}")
}

/// Output locations of a reference FASTA and its derived files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceArtifactSet {
    pub fasta: String,
    pub fasta_index: String,
    pub fasta_dictionary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_names() {
        assert_eq!(bam_link_name("S1"), "S1.bam");
        assert_eq!(bai_link_name("S1"), "S1.bam.bai");
    }

    #[test]
    fn test_to_link_map() {
        let mut map = SampleFileMap::new();
        map.insert(
            "S1",
            LinkedSample {
                bam: "/p/S1.bam".to_string(),
                bai: Some("/p/S1.bam.bai".to_string()),
            },
        );
        map.insert(
            "S2",
            LinkedSample {
                bam: "/p/S2.bam".to_string(),
                bai: None,
            },
        );

        let links = map.to_link_map();
        assert_eq!(links.len(), 3);
        assert_eq!(links["S1.bam"], "/p/S1.bam");
        assert_eq!(links["S1.bam.bai"], "/p/S1.bam.bai");
        assert_eq!(links["S2.bam"], "/p/S2.bam");
        assert!(!links.contains_key("S2.bam.bai"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = SampleFileMap::new();
        let first = LinkedSample {
            bam: "a.bam".to_string(),
            bai: None,
        };
        assert!(map.insert("S1", first.clone()).is_none());
        let replaced = map.insert(
            "S1",
            LinkedSample {
                bam: "b.bam".to_string(),
                bai: None,
            },
        );
        assert_eq!(replaced, Some(first));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("S1").unwrap().bam, "b.bam");
    }
}
