//! Core data types for BAM discovery and design tables.
//!
//! - [`AlignmentRecord`]: a BAM file found on disk and its optional index
//! - [`SampleFileMap`]: link names (`{sample}.bam`, `{sample}.bam.bai`) mapped to source paths
//! - [`ReferenceArtifactSet`]: where the reference FASTA, its index and its dictionary will live
//!
//! ## File naming
//!
//! | File | Name |
//! |------|------|
//! | Alignment | `{sample}.bam` |
//! | Alignment index | `{sample}.bam.bai` |
//! | Reference | `genomes/{basename}` |
//! | Reference index | `genomes/{basename}.fai` |
//! | Reference dictionary | `genomes/{basename}.dict` |

pub mod types;
