use crate::core::types::{ReferenceArtifactSet, GENOMES_DIR};

/// Where a reference FASTA and its `.fai` and `.dict` files will live.
///
/// Only the final path component of `fasta` is kept, so inputs in different
/// directories with the same file name map to the same artifacts. Nothing is
/// read from disk.
///
/// # Examples
///
/// ```
/// use bam_design::linking::reference::package_reference;
///
/// let refs = package_reference("/data/hg38/seq.fa");
/// assert_eq!(refs.fasta, "genomes/seq.fa");
/// assert_eq!(refs.fasta_index, "genomes/seq.fa.fai");
/// assert_eq!(refs.fasta_dictionary, "genomes/seq.fa.dict");
/// ```
#[must_use]
pub fn package_reference(fasta: &str) -> ReferenceArtifactSet {
    // Everything after the last separator: "dir/" has an empty basename, "." stays "."
    let basename = fasta.rsplit_once('/').map_or(fasta, |(_, name)| name);

    ReferenceArtifactSet {
        fasta: format!("{GENOMES_DIR}/{basename}"),
        fasta_index: format!("{GENOMES_DIR}/{basename}.fai"),
        fasta_dictionary: format!("{GENOMES_DIR}/{basename}.dict"),
    }
}
