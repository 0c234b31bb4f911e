//! Parsers for design tables.
//!
//! A design table is tab-separated with a header row. The first column holds
//! the sample name and is used as the row index; every other column is kept
//! as an optional string.
//!
//! ## Example
//!
//! ```rust
//! use bam_design::parsing::tsv::parse_tsv_text;
//!
//! let table = parse_tsv_text("sample\tbam\tbai\nS1\t/p/S1.bam\t\n").unwrap();
//! assert_eq!(table.get("S1", "bam"), Some("/p/S1.bam"));
//! assert_eq!(table.get("S1", "bai"), None);
//! ```

pub mod tsv;
