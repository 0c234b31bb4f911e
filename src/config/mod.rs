//! Run settings handed to the variant-calling workflow.
//!
//! Settings are assembled once from the parsed command line and written as
//! YAML next to the design table.

pub mod settings;
