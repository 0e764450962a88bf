//! preview-guard CLI - sanitize generated components for live previews.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "preview-guard")]
#[command(about = "Sanitize and validate generated component code for live previews")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to preview-guard.toml config file
    #[arg(short, long, default_value = "preview-guard.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and instruction prompt
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Run a component through the transformation service with retries
    Sanitize {
        /// Source file, or "-" for stdin
        input: PathBuf,

        /// Write the sanitized code here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply the deterministic auto-fixer to files (no service calls)
    Fix {
        /// Files or directories to fix
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write fixed code back to the files
        #[arg(short, long)]
        write: bool,
    },

    /// Validate files against the full rule set
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API
    Serve {
        /// Port to listen on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config)
        #[arg(long)]
        host: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Sanitize {
            input,
            output,
            json,
        } => {
            let config = config::load_config(&cli.config)?;
            commands::sanitize::run(config, input, output, json).await?;
        }
        Commands::Fix { paths, write } => {
            commands::fix::run(&paths, write)?;
        }
        Commands::Check { paths, json } => {
            commands::check::run(&paths, json)?;
        }
        Commands::Serve { port, host } => {
            let mut config = config::load_config(&cli.config)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            commands::serve::run(config).await?;
        }
    }

    Ok(())
}
