use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcriber_pipeline::config::{AppConfig, CliConfig, FileConfig};
use transcriber_pipeline::{
    archive, uploader, FsObjectStore, IngestionProcessor, ObjectStore, TranscriptProcessor,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[clap(name = "transcriber", about = "Media transcription pipeline tools")]
struct CliArgs {
    /// Path to an optional TOML config file; its values override CLI flags.
    #[clap(long, value_parser = parse_path)]
    config: Option<PathBuf>,

    /// Root directory of the object store (buckets are subdirectories).
    #[clap(long, value_parser = parse_path)]
    store_root: Option<PathBuf>,

    /// Bucket media objects are moved into for transcription.
    #[clap(long, default_value = "audio")]
    job_input_bucket: String,

    /// Bucket finished subtitle documents are written to.
    #[clap(long, default_value = "transcripts")]
    destination_bucket: String,

    /// IANA time zone used for the timestamp suffix in generated keys.
    #[clap(long, default_value = "UTC")]
    timezone: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process an upload notification: move the media object and print the
    /// transcription job descriptor.
    Ingest {
        /// Path to the upload-event JSON document.
        event: PathBuf,
    },
    /// Convert a finished transcription job's output document into an SRT
    /// subtitle object.
    Transcript {
        /// Path to the job-status JSON document.
        event: PathBuf,
    },
    /// Bundle a bucket's contents into a single timestamped zip object.
    ZipBucket {
        /// Bucket to archive.
        bucket: String,
    },
    /// Upload a local folder, skipping files the pipeline already
    /// processed.
    Upload {
        /// Local folder to upload recursively.
        #[clap(value_parser = parse_path)]
        local_folder: PathBuf,

        /// Bucket uploads land in.
        #[clap(long)]
        bucket: String,

        /// Bucket holding processed media, used to skip files that were
        /// already uploaded and renamed.
        #[clap(long)]
        processed_bucket: String,

        /// Report what would be uploaded without writing anything.
        #[clap(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;

    let cli_config = CliConfig {
        store_root: cli_args.store_root.clone(),
        job_input_bucket: cli_args.job_input_bucket.clone(),
        destination_bucket: cli_args.destination_bucket.clone(),
        timezone: cli_args.timezone.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(&config.store_root));

    match cli_args.command {
        Command::Ingest { event } => {
            let payload = tokio::fs::read_to_string(&event)
                .await
                .with_context(|| format!("Failed to read event file: {:?}", event))?;
            let event = IngestionProcessor::parse_event(&payload)?;

            let processor = IngestionProcessor::new(
                store,
                config.job_input_bucket.clone(),
                config.timezone,
            );
            let descriptor = processor.handle(&event).await?;

            // The descriptor goes to stdout for the orchestration layer to
            // hand to the transcription service.
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Command::Transcript { event } => {
            let payload = tokio::fs::read_to_string(&event)
                .await
                .with_context(|| format!("Failed to read event file: {:?}", event))?;
            let event = TranscriptProcessor::parse_event(&payload)?;

            let processor = TranscriptProcessor::new(store, config.destination_bucket.clone());
            let destination_key = processor.handle(&event).await?;
            info!(%destination_key, "subtitle stored");
        }
        Command::ZipBucket { bucket } => {
            let zip_key = archive::zip_bucket(store.as_ref(), &bucket, &Utc::now()).await?;
            info!(%bucket, %zip_key, "bucket archived");
        }
        Command::Upload {
            local_folder,
            bucket,
            processed_bucket,
            dry_run,
        } => {
            let report = uploader::upload_folder(
                store.as_ref(),
                &local_folder,
                &bucket,
                &processed_bucket,
                dry_run,
            )
            .await?;
            println!(
                "Processed {} files: {} uploaded, {} already uploaded, {} skipped, {} failed",
                report.processed,
                report.uploaded,
                report.already_uploaded,
                report.skipped.len(),
                report.failed.len()
            );
        }
    }

    Ok(())
}
