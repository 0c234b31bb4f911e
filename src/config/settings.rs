use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::types::ReferenceArtifactSet;
use crate::linking::reference::package_reference;
use crate::utils::fs::write_atomic;

/// File name of the design table inside the working directory
pub const DESIGN_FILE: &str = "design.tsv";

/// File name of the settings file inside the working directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Default container image for workflow rules
pub const DEFAULT_IMAGE: &str = "docker://continuumio/miniconda3:4.4.10";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to serialize settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Extra command line arguments passed through to each workflow tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParams {
    pub copy_extra: String,
    pub picard_create_sequence_dictionary_extra: String,
    pub samtools_mpileup_extra: String,
    pub varscan_pileup2snp_extra: String,
    pub varscan_pileup2indel_extra: String,
    pub gatk_mutect2_extra: String,
    pub strelka_config_extra: String,
    pub strelka_run_extra: String,
}

impl Default for ToolParams {
    fn default() -> Self {
        Self {
            copy_extra: "--verbose".to_string(),
            picard_create_sequence_dictionary_extra: String::new(),
            samtools_mpileup_extra: String::new(),
            varscan_pileup2snp_extra: String::new(),
            varscan_pileup2indel_extra: String::new(),
            gatk_mutect2_extra: String::new(),
            strelka_config_extra: String::new(),
            strelka_run_extra: String::new(),
        }
    }
}

/// Reference FASTA given on the command line and where its artifacts will live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSettings {
    /// Path the FASTA is copied from
    pub source: String,

    #[serde(flatten)]
    pub artifacts: ReferenceArtifactSet,
}

/// Options the settings are assembled from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub bam_dir: PathBuf,
    pub workdir: PathBuf,
    pub threads: usize,
    pub image: String,
    pub cold_storage: Vec<String>,
    pub fasta: Option<String>,
    pub params: ToolParams,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            bam_dir: PathBuf::from("."),
            workdir: PathBuf::from("."),
            threads: 1,
            image: DEFAULT_IMAGE.to_string(),
            cold_storage: Vec::new(),
            fasta: None,
            params: ToolParams::default(),
        }
    }
}

/// Flat settings consumed by the workflow engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Path to the design table
    pub design: PathBuf,

    /// Path to this settings file
    pub config: PathBuf,

    pub workdir: PathBuf,

    pub threads: usize,

    pub singularity_docker_image: String,

    /// Mount points of cold storage, bound into containers
    pub cold_storage: Vec<String>,

    pub bam_dir: PathBuf,

    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSettings>,

    pub params: ToolParams,
}

impl RunSettings {
    pub fn from_options(options: &RunOptions) -> Self {
        let reference = options.fasta.as_ref().map(|fasta| ReferenceSettings {
            source: fasta.clone(),
            artifacts: package_reference(fasta),
        });

        let settings = Self {
            design: options.workdir.join(DESIGN_FILE),
            config: options.workdir.join(CONFIG_FILE),
            workdir: options.workdir.clone(),
            threads: options.threads,
            singularity_docker_image: options.image.clone(),
            cold_storage: options.cold_storage.clone(),
            bam_dir: options.bam_dir.clone(),
            reference,
            params: options.params.clone(),
        };

        debug!(?settings, "Assembled run settings");
        settings
    }

    /// Render as YAML
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Yaml` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, SettingsError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the YAML rendering to `path`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the settings cannot be rendered or written.
    pub fn write_yaml(&self, path: &Path) -> Result<(), SettingsError> {
        let text = self.to_yaml()?;
        write_atomic(path, text.as_bytes())?;
        Ok(())
    }
}
