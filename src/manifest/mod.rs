//! Design tables: one row per sample, indexed by sample name.
//!
//! - [`table`]: the [`Manifest`](table::Manifest) table and its TSV output
//! - [`merge`]: left-joins newly discovered samples onto a previous design table
//!
//! ## Output layout
//!
//! | Column | Contents |
//! |--------|----------|
//! | `sample` | Sample name (index) |
//! | `bam` | Path to the BAM file |
//! | `bai` | Path to the BAM index, empty when there is none |
//! | ... | Columns carried over from the previous design table |

pub mod merge;
pub mod table;
