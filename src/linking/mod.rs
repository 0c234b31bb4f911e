//! Naming of the files handed to the variant-calling workflow.
//!
//! - [`linker`]: pairs sample names with their BAM and optional index under
//!   `{sample}.bam` / `{sample}.bam.bai` link names
//! - [`reference`]: places a reference FASTA and its derived files under `genomes/`

pub mod linker;
pub mod reference;
