//! PaperForge CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Generate a research paper for a topic
//! - `doctor`  — Check configuration and credentials
//! - `config`  — Show, locate or validate the configuration

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(
    name = "paperforge",
    about = "PaperForge — research paper generator",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a research paper (prompts for anything not given)
    Run {
        /// Research topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Output format: txt, md or docx
        #[arg(short, long)]
        format: Option<String>,

        /// Directory to write the paper into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Evidence provider: openalex or google
        #[arg(short, long)]
        evidence: Option<String>,
    },

    /// Diagnose configuration and credentials
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so progress output stays readable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            topic,
            format,
            output_dir,
            evidence,
        } => {
            let args = commands::run::RunArgs {
                topic,
                format,
                output_dir,
                evidence,
            };
            let run = commands::run::run(args);
            match commands::run::until_cancelled(run, tokio::signal::ctrl_c()).await {
                Some(result) => result,
                None => {
                    println!("\nOperation cancelled by user.");
                    let _ = std::io::stdout().flush();
                    // A pending stdin read would keep the runtime from shutting down.
                    std::process::exit(0);
                }
            }
        }
        Commands::Doctor => commands::doctor::run().await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await,
            ConfigAction::Path => commands::config_cmd::path().await,
            ConfigAction::Validate => commands::config_cmd::validate().await,
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
