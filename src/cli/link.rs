use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::linking::linker::link_samples;
use crate::manifest::table::{BAI_COLUMN, BAM_COLUMN};
use crate::parsing::tsv::parse_tsv_file;

#[derive(Args)]
pub struct LinkArgs {
    /// Design table written by `prepare`
    #[arg(long, required = true, value_name = "PATH")]
    pub design: PathBuf,
}

/// Execute link subcommand
///
/// # Errors
///
/// Returns an error if the design table cannot be read or parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LinkArgs, format: OutputFormat) -> anyhow::Result<()> {
    let links = design_links(&args.design)?;

    match format {
        OutputFormat::Text => {
            for (name, path) in &links {
                println!("{name} -> {path}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
        OutputFormat::Tsv => {
            println!("link\tpath");
            for (name, path) in &links {
                println!("{name}\t{path}");
            }
        }
    }

    Ok(())
}

/// Link names and source paths for the samples of a design table
///
/// # Errors
///
/// Returns an error if the design table cannot be read or parsed.
pub fn design_links(design: &std::path::Path) -> anyhow::Result<BTreeMap<String, String>> {
    let table = parse_tsv_file(design)
        .with_context(|| format!("Failed to read design table {}", design.display()))?;

    let samples: Vec<&str> = table.samples().collect();
    let bams = table.column_values(BAM_COLUMN);
    let bais = table.column_values(BAI_COLUMN);

    if bams.is_none() {
        tracing::warn!(
            "Design table {} has no '{BAM_COLUMN}' column",
            design.display()
        );
    }

    Ok(link_samples(&samples, bams.as_deref(), bais.as_deref()).to_link_map())
}
