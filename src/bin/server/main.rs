//! polyglot-ocr server and CLI
//!
//! Runs one recognition engine per language and either keeps the best
//! engine's output or merges all of them.
//!
//! # Usage
//!
//! ## CLI Mode
//! ```bash
//! polyglot-ocr-server ocr --file image.jpg --langs en,french --merge --models-dir recordings
//! polyglot-ocr-server ocr --url "https://example.com/image.jpg" --backend oar --models-dir models
//! ```
//!
//! ## Server Mode
//! ```bash
//! OCR_LANGS=en,french,arabic polyglot-ocr-server serve --backend oar --models-dir models --port 8080
//! ```

mod cli;
mod config;
mod ocr;
mod server;

use clap::{Args, Parser, Subcommand};
use polyglot_ocr::arbitration::{Mode, RecognitionRequest};
use polyglot_ocr::core::config::{GatewayConfig, ParallelPolicy};
use polyglot_ocr::engines::EngineBackend;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "polyglot-ocr-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-language OCR via CLI or HTTP server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by both subcommands
#[derive(Args)]
struct EngineArgs {
    /// Comma-separated language keys to load engines for
    /// [default: $OCR_LANGS, else en,french,arabic]
    #[arg(long)]
    langs: Option<String>,

    /// Recognition backend (replay, oar)
    #[arg(long, default_value = "replay", env = "POLYGLOT_BACKEND")]
    backend: EngineBackend,

    /// Directory holding per-language recordings or models
    #[arg(long = "models-dir", default_value = "models", env = "POLYGLOT_MODELS_DIR")]
    models_dir: PathBuf,

    /// Number of rayon worker threads (defaults to number of CPUs)
    #[arg(long, env = "POLYGLOT_THREADS")]
    threads: Option<usize>,

    /// Run the engines of a request one after another
    #[arg(long)]
    sequential: bool,
}

impl EngineArgs {
    fn into_config(self) -> Result<config::EngineConfig, ocr::OcrError> {
        let parallel = ParallelPolicy::new()
            .with_max_threads(self.threads)
            .with_parallel_languages(!self.sequential);
        let gateway = match self.langs.as_deref() {
            Some(list) => GatewayConfig::from_language_list(list)?,
            None => GatewayConfig::from_env()?,
        }
        .with_parallel(parallel);

        Ok(config::EngineConfig {
            gateway,
            backend: self.backend,
            models_dir: self.models_dir,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single image via CLI
    Ocr {
        /// URL of the image to process
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Local file path of the image to process
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,

        /// Merge the outputs of all languages instead of keeping the best one
        #[arg(long)]
        merge: bool,

        /// Output format (json, text, pretty)
        #[arg(long, default_value = "pretty")]
        output: String,

        #[command(flatten)]
        engines: EngineArgs,
    },
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, short, default_value = "8080", env = "POLYGLOT_PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0", env = "POLYGLOT_HOST")]
        host: String,

        /// Maximum accepted upload size in megabytes
        #[arg(long = "max-upload-mb", default_value = "20", env = "POLYGLOT_MAX_UPLOAD_MB")]
        max_upload_mb: usize,

        #[command(flatten)]
        engines: EngineArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    polyglot_ocr::utils::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ocr {
            url,
            file,
            merge,
            output,
            engines,
        } => {
            let config = engines.into_config()?;
            let mode = if merge { Mode::Merge } else { Mode::SingleBest };
            let request = RecognitionRequest::default().with_mode(mode);

            if let Some(url) = url {
                info!("Processing URL: {}", url);
                cli::process_url(&url, &config, &request, &output).await?;
            } else if let Some(file) = file {
                info!("Processing file: {}", file.display());
                cli::process_file(&file, &config, &request, &output)?;
            } else {
                eprintln!("Error: Either --url or --file must be provided");
                std::process::exit(1);
            }
        }
        Commands::Serve {
            port,
            host,
            max_upload_mb,
            engines,
        } => {
            let config = config::ServerConfig {
                engines: engines.into_config()?,
                host,
                port,
                max_upload_bytes: max_upload_mb * 1024 * 1024,
            };

            info!(
                "Starting server on {}:{} for languages {:?}",
                config.host, config.port, config.engines.gateway.languages
            );
            server::run_server(config).await?;
        }
    }

    Ok(())
}
