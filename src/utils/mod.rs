//! Shared helpers: input validation and file output.

pub mod fs;
pub mod validation;
