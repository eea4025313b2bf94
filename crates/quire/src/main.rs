//! Quire CLI - documentation site builder.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Documentation site builder that ships raw page sources with page data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docs.toml config file
    #[arg(short, long, default_value = "docs.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build page data and the hydration runtime
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview built output, with raw page sources under /raw/
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Print the raw source recorded for a page
    Raw {
        /// Logical page path, e.g. guide/quick-start.md
        path: String,

        /// Build output directory
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `quire raw` output stays clean
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, minify).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(port, dir, !no_open).await?;
        }
        Commands::Raw { path, dir } => {
            commands::raw::run(&dir, &path)?;
        }
    }

    Ok(())
}
