mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use chrono_tz::Tz;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML
/// config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub store_root: Option<PathBuf>,
    pub job_input_bucket: String,
    pub destination_bucket: String,
    pub timezone: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_root: None,
            job_input_bucket: "audio".to_string(),
            destination_bucket: "transcripts".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Resolved configuration handed to the processors. Buckets and timezone
/// are passed on as explicit parameters; nothing below this point reads
/// ambient process state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory of the object store; buckets are subdirectories.
    pub store_root: PathBuf,
    /// Bucket media objects are moved into for transcription.
    pub job_input_bucket: String,
    /// Bucket finished subtitle documents are written to.
    pub destination_bucket: String,
    /// Target zone for the timestamp suffix in generated keys.
    pub timezone: Tz,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let store_root = file
            .store_root
            .map(PathBuf::from)
            .or_else(|| cli.store_root.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("store_root must be specified via --store-root or in config file")
            })?;

        if !store_root.exists() {
            bail!("Store root directory does not exist: {:?}", store_root);
        }
        if !store_root.is_dir() {
            bail!("store_root is not a directory: {:?}", store_root);
        }

        let job_input_bucket = file
            .job_input_bucket
            .unwrap_or_else(|| cli.job_input_bucket.clone());
        let destination_bucket = file
            .destination_bucket
            .unwrap_or_else(|| cli.destination_bucket.clone());

        let timezone_name = file.timezone.unwrap_or_else(|| cli.timezone.clone());
        let timezone: Tz = match timezone_name.parse() {
            Ok(tz) => tz,
            Err(_) => bail!("Unknown timezone: {:?}", timezone_name),
        };

        Ok(Self {
            store_root,
            job_input_bucket,
            destination_bucket,
            timezone,
        })
    }
}
