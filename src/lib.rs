//! # bam-design
//!
//! Prepares the inputs of a BAM-based variant-calling workflow.
//!
//! Alignment files usually come out of a previous mapping workflow, spread over
//! several directories, some with an index and some without. `bam-design`
//! searches a directory tree for them, pairs each BAM with its `.bai` index when
//! one exists, and writes:
//!
//! - a **design table** (`design.tsv`): one row per sample with its BAM, its
//!   index, and any columns carried over from the previous design table
//! - a **run configuration** (`config.yaml`): the settings read by the workflow
//!
//! Only paths are inspected; BAM contents are never read.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bam_design::discovery::walker::find_bams;
//! use bam_design::linking::linker::link_records;
//! use bam_design::manifest::merge::merge;
//! use bam_design::manifest::table::Manifest;
//! use std::path::Path;
//!
//! let records = find_bams(Path::new("bams/")).unwrap();
//! let samples = link_records(&records);
//!
//! let design = merge(
//!     Manifest::from_samples(&samples),
//!     Some(Path::new("mapping/design.tsv")),
//! );
//! design.write_tsv(Path::new("design.tsv")).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for alignment records, links and reference artifacts
//! - [`discovery`]: Recursive BAM search
//! - [`linking`]: Sample link names and reference packaging
//! - [`manifest`]: Design tables and merging with a previous design
//! - [`parsing`]: Design table parser
//! - [`config`]: Run settings
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod discovery;
pub mod linking;
pub mod manifest;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::settings::{RunOptions, RunSettings};
pub use core::types::*;
pub use discovery::walker::{find_bams, BamWalker};
pub use linking::linker::{link_samples, SampleLinker};
pub use linking::reference::package_reference;
pub use manifest::merge::{ManifestMerger, MergePolicy};
pub use manifest::table::Manifest;
