//! Recursive discovery of BAM files and their indexes.
//!
//! Discovery only inspects filesystem paths; alignment records are never opened.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bam_design::discovery::walker::BamWalker;
//!
//! for record in BamWalker::new("bams/") {
//!     let record = record.unwrap();
//!     println!("{}\t{}", record.sample, record.bam.display());
//! }
//! ```

pub mod walker;
