//! Synthia CLI - text generation, image captioning and image generation
//! through hosted inference models.
//!
//! # Usage
//!
//! ```bash
//! # Generate text
//! synthia text "Explain Machine Learning to me in a nutshell."
//!
//! # Caption an image
//! synthia caption ./photo.jpg
//!
//! # Generate an image
//! synthia image "a lighthouse at dusk" --output lighthouse.png
//!
//! # View configuration
//! synthia config show
//! ```

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod cli;
mod logging;

/// Synthia - your personal AI assistant on the command line.
#[derive(Parser, Debug)]
#[command(name = "synthia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    session: cli::SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate text from a prompt
    Text(cli::text::TextArgs),

    /// Caption a JPEG or PNG image
    Caption(cli::caption::CaptionArgs),

    /// Generate an image from a prompt
    Image(cli::image::ImageArgs),

    /// List example prompts
    Prompts,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match synthia_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `synthia config path`."
            );
            synthia_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Synthia v{}", synthia_core::VERSION);

    match cli.command {
        Commands::Text(args) => cli::text::execute(args, cli.session.apply(config)?).await,
        Commands::Caption(args) => cli::caption::execute(args, cli.session.apply(config)?).await,
        Commands::Image(args) => cli::image::execute(args, cli.session.apply(config)?).await,
        Commands::Prompts => {
            cli::prompts::execute();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => {
            cli::config::execute(args).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
