use clap::Args;

use crate::cli::OutputFormat;
use crate::linking::reference::package_reference;

#[derive(Args)]
pub struct RefsArgs {
    /// Reference FASTA (only its file name is used)
    #[arg(required = true)]
    pub fasta: String,
}

/// Execute refs subcommand
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RefsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let refs = package_reference(&args.fasta);

    match format {
        OutputFormat::Text => {
            println!("fasta: {}", refs.fasta);
            println!("fasta_index: {}", refs.fasta_index);
            println!("fasta_dictionary: {}", refs.fasta_dictionary);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&refs)?),
        OutputFormat::Tsv => {
            println!("fasta\tfasta_index\tfasta_dictionary");
            println!(
                "{}\t{}\t{}",
                refs.fasta, refs.fasta_index, refs.fasta_dictionary
            );
        }
    }

    Ok(())
}
