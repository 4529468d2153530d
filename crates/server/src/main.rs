//! Folio chat backend
//!
//! Main entry point for the `folio` binary. Indexes the project corpus and
//! serves the retrieval-augmented chat API.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{IndexCommand, ServeCommand};
use folio_core::{logging, AppConfig, ConfigOverrides};
use std::path::PathBuf;

/// Folio - chat with a portfolio of projects
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Retrieval-augmented chat over a project portfolio", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the project corpus (JSON)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index the corpus and serve the chat API (default)
    Serve(ServeCommand),

    /// Index the corpus and exit
    Index(IndexCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeCommand::default()));

    let bind = match &command {
        Commands::Serve(cmd) => cmd.bind.clone(),
        Commands::Index(_) => None,
    };

    let config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(ConfigOverrides {
            bind,
            corpus: cli.corpus,
            log_level: cli.log_level,
            verbose: cli.verbose,
            no_color: cli.no_color,
            log_json: cli.log_json,
        });

    logging::init_logging(
        config.logging.level.as_deref(),
        !config.logging.color,
        config.logging.json,
    )
    .context("Failed to initialize logging")?;

    tracing::info!("Folio starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Corpus: {:?}", config.corpus.path);
    tracing::debug!(
        "Embedding: {} ({}), store: {}, llm: {} ({})",
        config.embedding.provider,
        config.embedding.model,
        config.store.backend,
        config.llm.provider,
        config.llm.model
    );

    config.validate().context("Invalid configuration")?;

    let command_name = match &command {
        Commands::Serve(_) => "serve",
        Commands::Index(_) => "index",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.with_context(|| format!("folio {} failed", command_name))
}
