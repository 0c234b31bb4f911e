//! Command-line interface for bam-design.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **prepare**: Find BAM files, write the design table and the run settings
//! - **link**: Show the `{sample}.bam` / `{sample}.bam.bai` links of a design table
//! - **refs**: Show where a reference FASTA and its index and dictionary will live
//!
//! ## Usage
//!
//! ```text
//! # Build design.tsv and config.yaml in a working directory
//! bam-design prepare --bam-dir bams/ --workdir run1 --threads 8
//!
//! # Carry sample annotations over from a mapping run
//! bam-design prepare --bam-dir bams/ --previous-design mapping/design.tsv
//!
//! # Links the workflow will create, as JSON
//! bam-design link --design run1/design.tsv --format json
//!
//! # Reference artifacts
//! bam-design refs /refs/hg38/genome.fa
//! ```

use clap::{Parser, Subcommand};

pub mod link;
pub mod prepare;
pub mod refs;

#[derive(Parser)]
#[command(name = "bam-design")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Prepare the design table and configuration for BAM-based variant calling")]
#[command(
    long_about = "bam-design searches a directory for BAM files and their indexes, merges them with an optional previous design table, and writes both the design table and the configuration used by the variant-calling workflow.\n\nIt does not perform magic. Please check the prepared configuration file!"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the design table and run configuration
    Prepare(prepare::PrepareArgs),

    /// Show the sample file links of a design table
    Link(link::LinkArgs),

    /// Show the packaged locations of a reference FASTA
    Refs(refs::RefsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

impl Cli {
    /// Log filter directives selected by the debug and quiet flags
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "bam_design=debug,info"
        } else if self.quiet {
            "bam_design=error,error"
        } else {
            "bam_design=info,warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_quiet_conflict() {
        let result = Cli::try_parse_from(["bam-design", "-d", "-q", "refs", "seq.fa"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_filter() {
        let cli = Cli::try_parse_from(["bam-design", "refs", "seq.fa"]).unwrap();
        assert_eq!(cli.log_filter(), "bam_design=info,warn");

        let cli = Cli::try_parse_from(["bam-design", "refs", "seq.fa", "--debug"]).unwrap();
        assert_eq!(cli.log_filter(), "bam_design=debug,info");

        let cli = Cli::try_parse_from(["bam-design", "-q", "refs", "seq.fa"]).unwrap();
        assert_eq!(cli.log_filter(), "bam_design=error,error");
    }
}
