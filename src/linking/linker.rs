use tracing::{debug, warn, Span};

use crate::core::types::{AlignmentRecord, LinkedSample, SampleFileMap};

/// Accumulates linked samples into a [`SampleFileMap`].
///
/// A sample is linked only when it has a BAM path. Its index is linked only
/// together with that BAM, so an index never appears on its own. Adding a
/// sample name twice replaces the earlier entry and logs a warning.
pub struct SampleLinker {
    links: SampleFileMap,
    duplicates: usize,
    span: Span,
}

impl SampleLinker {
    pub fn new() -> Self {
        Self {
            links: SampleFileMap::new(),
            duplicates: 0,
            span: tracing::debug_span!("linking"),
        }
    }

    /// Emit linking events under the given span instead of the default one
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Link one sample. Returns `true` if the sample was added.
    pub fn add(&mut self, sample: &str, bam: Option<&str>, bai: Option<&str>) -> bool {
        let _entered = self.span.enter();

        let Some(bam) = bam else {
            if bai.is_some() {
                debug!(sample, "Ignoring index of sample without BAM");
            } else {
                debug!(sample, "Sample has no BAM");
            }
            return false;
        };

        let linked = LinkedSample {
            bam: bam.to_string(),
            bai: bai.map(str::to_string),
        };

        if let Some(previous) = self.links.insert(sample, linked) {
            self.duplicates += 1;
            warn!(
                sample,
                replaced = %previous.bam,
                kept = bam,
                "Duplicate sample name, keeping the last one"
            );
        }
        true
    }

    /// Link a discovered record. Records with non UTF-8 paths are not linked.
    pub fn add_record(&mut self, record: &AlignmentRecord) -> bool {
        let bam = record.bam.to_str();
        let bai = match record.bai.as_deref() {
            Some(bai) => bai.to_str().map(Some),
            None => Some(None),
        };
        let (Some(bam), Some(bai)) = (bam, bai) else {
            let _entered = self.span.enter();
            warn!(
                sample = %record.sample,
                bam = %record.bam.display(),
                "Skipping record with a non UTF-8 path"
            );
            return false;
        };
        self.add(&record.sample, Some(bam), bai)
    }

    /// Number of sample names seen more than once so far
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn finish(self) -> SampleFileMap {
        self.links
    }
}

impl Default for SampleLinker {
    fn default() -> Self {
        Self::new()
    }
}

/// Link positionally aligned samples, BAM paths and index paths.
///
/// Position `i` of `bams` and `bais` describes `sample_ids[i]`. A missing
/// sequence (`None`) or a position past its end counts as absent.
pub fn link_samples(
    sample_ids: &[&str],
    bams: Option<&[Option<&str>]>,
    bais: Option<&[Option<&str>]>,
) -> SampleFileMap {
    let mut linker = SampleLinker::new();

    if let Some(bams) = bams {
        if bams.len() != sample_ids.len() {
            warn!(
                samples = sample_ids.len(),
                bams = bams.len(),
                "Sample and BAM lists differ in length"
            );
        }
    }

    for (i, sample) in sample_ids.iter().enumerate() {
        let bam = bams.and_then(|b| b.get(i)).copied().flatten();
        let bai = bais.and_then(|b| b.get(i)).copied().flatten();
        linker.add(sample, bam, bai);
    }

    linker.finish()
}

/// Link every discovered record
pub fn link_records<'a>(records: impl IntoIterator<Item = &'a AlignmentRecord>) -> SampleFileMap {
    let mut linker = SampleLinker::new();
    for record in records {
        linker.add_record(record);
    }
    linker.finish()
}
