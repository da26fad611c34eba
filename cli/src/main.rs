//! # ejbpack Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the ejbpack CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`build`, `files`) is a variant of the `Commands` enum
//! - Commands are mapped to handler functions in their respective modules
//! - All errors are propagated to this level, printed once, and turned into exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! ejbpack --help
//!
//! # Build with info-level logging
//! ejbpack -v build --generate-client
//!
//! # See what the client archive would contain
//! ejbpack files --client
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // `build` and `files`
mod common; // Archive writing and filesystem utilities
mod core; // Configuration, errors, selection and validation rules

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "ejbpack",
    about = "Packages compiled Enterprise JavaBeans into EJB and EJB client JAR archives",
    long_about = "Packages a directory of compiled classes and its ejb-jar.xml deployment descriptor \
                  into an EJB archive, and optionally a reduced client archive for remote callers.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Build the EJB archive (and the client archive when enabled).
    #[command(alias = "b")]
    Build(commands::build::BuildArgs),
    /// List the entries an archive would contain, without writing it.
    #[command(alias = "f")]
    Files(commands::files::FilesArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Build(args) => commands::build::handle_build(args),
        Commands::Files(args) => commands::files::handle_files(args),
    };

    if let Err(e) = command_result {
        tracing::debug!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
