//! Circular Fetcher CLI application
//!
//! Command-line interface for archiving Central Bank of Nigeria circulars:
//! `extract` builds the manifest, `download` fetches and validates the PDFs,
//! `status` reports progress.

use std::process;

use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use circular_fetcher::cli::{handle_download, handle_extract, handle_status, Cli, Commands};
use circular_fetcher::config::AppConfig;
use circular_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error [{}]: {}", e.category(), e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("Circular Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Extract(args) => {
            info!("Executing extract command");
            handle_extract(args, config).await
        }
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(args, config, cli.global.quiet).await
        }
        Commands::Status(args) => handle_status(args, config).await,
    }
}

/// Initialize logging based on CLI verbosity and the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let configured = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let log_level = cli.log_level(configured);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("circular_fetcher={}", log_level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
