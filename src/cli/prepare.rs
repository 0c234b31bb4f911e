use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{debug, info, Span};

use crate::config::settings::{RunOptions, RunSettings, ToolParams, DEFAULT_IMAGE};
use crate::discovery::walker::BamWalker;
use crate::linking::linker::SampleLinker;
use crate::manifest::merge::{ManifestMerger, MergePolicy};
use crate::manifest::table::Manifest;

#[derive(Args)]
pub struct PrepareArgs {
    /// Directory searched (recursively) for BAM files
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub bam_dir: PathBuf,

    /// Previous design table, e.g. from the mapping workflow
    #[arg(long, value_name = "PATH")]
    pub previous_design: Option<PathBuf>,

    /// Keep samples that are in the previous design but were not found again
    #[arg(long)]
    pub keep_previous_samples: bool,

    /// Working directory receiving design.tsv and config.yaml
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub workdir: PathBuf,

    /// Maximum number of threads used
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Docker/Singularity image
    #[arg(long, default_value = DEFAULT_IMAGE)]
    pub singularity: String,

    /// Absolute paths to cold storage mount points
    #[arg(long, num_args = 1.., value_name = "PATH")]
    pub cold_storage: Vec<String>,

    /// Reference FASTA used for variant calling
    #[arg(long, value_name = "PATH")]
    pub fasta: Option<String>,

    // === Extra parameters for workflow tools ===
    /// Extra parameters for bash cp
    #[arg(long, default_value = "--verbose", allow_hyphen_values = true)]
    pub copy_extra: String,

    /// Extra parameters for Picard CreateSequenceDictionary
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub picard_create_sequence_dictionary_extra: String,

    /// Extra parameters for samtools mpileup
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub samtools_mpileup_extra: String,

    /// Extra parameters for VarScan pileup2snp
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub varscan_pileup2snp_extra: String,

    /// Extra parameters for VarScan pileup2indel
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub varscan_pileup2indel_extra: String,

    /// Extra parameters for GATK Mutect2
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub gatk_mutect2_extra: String,

    /// Extra parameters for Strelka configuration
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub strelka_config_extra: String,

    /// Extra parameters for Strelka run
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub strelka_run_extra: String,
}

impl PrepareArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            bam_dir: self.bam_dir.clone(),
            workdir: self.workdir.clone(),
            threads: self.threads as usize,
            image: self.singularity.clone(),
            cold_storage: self.cold_storage.clone(),
            fasta: self.fasta.clone(),
            params: ToolParams {
                copy_extra: self.copy_extra.clone(),
                picard_create_sequence_dictionary_extra: self
                    .picard_create_sequence_dictionary_extra
                    .clone(),
                samtools_mpileup_extra: self.samtools_mpileup_extra.clone(),
                varscan_pileup2snp_extra: self.varscan_pileup2snp_extra.clone(),
                varscan_pileup2indel_extra: self.varscan_pileup2indel_extra.clone(),
                gatk_mutect2_extra: self.gatk_mutect2_extra.clone(),
                strelka_config_extra: self.strelka_config_extra.clone(),
                strelka_run_extra: self.strelka_run_extra.clone(),
            },
        }
    }

    pub fn merge_policy(&self) -> MergePolicy {
        if self.keep_previous_samples {
            MergePolicy::Outer
        } else {
            MergePolicy::Left
        }
    }
}

/// Execute prepare subcommand
///
/// # Errors
///
/// Returns an error if the working directory cannot be created, the BAM
/// directory cannot be walked, or an output file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PrepareArgs) -> anyhow::Result<()> {
    let options = args.run_options();
    let span = tracing::info_span!("prepare");
    let _entered = span.enter();

    debug!(workdir = %options.workdir.display(), "Building output directory");
    std::fs::create_dir_all(&options.workdir).with_context(|| {
        format!(
            "Failed to create working directory {}",
            options.workdir.display()
        )
    })?;

    debug!("Building configuration");
    let settings = RunSettings::from_options(&options);
    settings
        .write_yaml(&settings.config)
        .with_context(|| format!("Failed to write {}", settings.config.display()))?;
    info!(path = %settings.config.display(), "Wrote run settings");

    debug!("Building design");
    let design = build_design(
        &options.bam_dir,
        args.previous_design.as_deref(),
        args.merge_policy(),
        &span,
    )?;
    design
        .write_tsv(&settings.design)
        .with_context(|| format!("Failed to write {}", settings.design.display()))?;
    info!(
        path = %settings.design.display(),
        samples = design.len(),
        "Wrote design table"
    );

    Ok(())
}

/// Find BAM files under `bam_dir`, link them, and merge with the previous design.
///
/// Each stage logs under its own child span of `parent`.
///
/// # Errors
///
/// Returns an error if any directory below `bam_dir` cannot be read.
pub fn build_design(
    bam_dir: &Path,
    previous_design: Option<&Path>,
    policy: MergePolicy,
    parent: &Span,
) -> anyhow::Result<Manifest> {
    let walker = BamWalker::new(bam_dir).with_span(tracing::debug_span!(
        parent: parent,
        "discovery",
        root = %bam_dir.display()
    ));
    let mut linker = SampleLinker::new().with_span(tracing::debug_span!(parent: parent, "linking"));

    let mut found = 0;
    for record in walker {
        let record = record
            .with_context(|| format!("Failed to search {} for BAM files", bam_dir.display()))?;
        found += 1;
        linker.add_record(&record);
    }

    let duplicates = linker.duplicates();
    let samples = linker.finish();
    info!(
        bams = found,
        samples = samples.len(),
        duplicates,
        "Searched {} for BAM files",
        bam_dir.display()
    );

    let merger = ManifestMerger::new()
        .with_policy(policy)
        .with_span(tracing::debug_span!(parent: parent, "merge"));
    Ok(merger.merge(Manifest::from_samples(&samples), previous_design))
}
