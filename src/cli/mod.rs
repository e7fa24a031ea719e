//! Command-line interface for pal
//!
//! The default action sends a message about the project to the configured
//! model; `init`, `config` and `analyze` manage and inspect the setup.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod analyze;
mod ask;
mod init;
mod print_config;
mod utils;

/// Talk to an LLM about your source code and documentation
#[derive(Parser)]
#[command(name = "pal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the project's root directory
    #[arg(
        short = 'p',
        long = "project-path",
        visible_alias = "path",
        value_name = "PATH",
        default_value = ".",
        global = true
    )]
    project_path: PathBuf,

    /// Continue the most recent conversation
    #[arg(short = 'c', long = "continue")]
    continue_conversation: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Message for the model; combined with anything piped on stdin
    #[arg(value_name = "MESSAGE")]
    message: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with a minimal pal.toml
    Init(init::InitArgs),

    /// Resolve and print the final configuration
    Config,

    /// Print information on the context that would be sent
    Analyze,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Some(Commands::Init(args)) => init::run(&cli.project_path, args),
        Some(Commands::Config) => print_config::run(&cli.project_path),
        Some(Commands::Analyze) => analyze::run(&cli.project_path),
        None => ask::run(&cli.project_path, cli.message.as_deref(), cli.continue_conversation),
    }
}
