//! querylens CLI: the main entry point.
//!
//! Commands:
//! - `analyze`   : Interpret a question into a business context profile
//! - `prioritize`: Analyze, gather candidates, and select context under budget
//! - `optimize`  : Run a single selection strategy over the candidates
//! - `config`    : Print the default configuration or validate the active one

use clap::{Parser, Subcommand};
use querylens_core::section::OptimizationStrategy;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "querylens",
    about = "querylens: question interpretation and token-budgeted context selection",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.querylens/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a question and print its profile as JSON
    Analyze {
        question: String,

        /// User the question is asked on behalf of
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Select the best context sections for a question
    Prioritize {
        question: String,

        /// JSON file holding the candidate schema
        #[arg(long)]
        candidates: PathBuf,

        /// Context token budget (default: prioritization.context_tokens)
        #[arg(short, long)]
        budget: Option<usize>,

        #[arg(short, long)]
        user: Option<String>,
    },

    /// Run one selection strategy and print the result with its metrics
    Optimize {
        question: String,

        #[arg(long)]
        candidates: PathBuf,

        /// max-relevance, max-coverage, min-tokens or balanced
        #[arg(short, long)]
        strategy: Option<OptimizationStrategy>,

        #[arg(short, long)]
        budget: Option<usize>,
    },

    /// Print the default configuration, or validate the active one
    Config {
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output.
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.json {
        builder.json().init();
    } else {
        builder.init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Analyze { question, user } => {
            commands::analyze::run(config_path, &question, user.as_deref()).await?
        }
        Commands::Prioritize {
            question,
            candidates,
            budget,
            user,
        } => {
            commands::prioritize::run(config_path, &question, &candidates, budget, user.as_deref())
                .await?
        }
        Commands::Optimize {
            question,
            candidates,
            strategy,
            budget,
        } => commands::optimize::run(config_path, &question, &candidates, strategy, budget).await?,
        Commands::Config { validate } => commands::config_cmd::run(config_path, validate)?,
    }

    Ok(())
}
