//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{follow, view};
use crate::domain::Axis;
use crate::storage::{self, Config};

#[derive(Parser)]
#[command(name = "mtree")]
#[command(author, version, about = "Browse Kubernetes-style YAML manifests by kind, label and namespace")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show manifests grouped along one axis
    Tree {
        /// YAML file or directory
        path: PathBuf,

        /// Grouping axis (defaults to the project config)
        #[arg(long, short)]
        axis: Option<Axis>,

        /// Levels to expand (all when omitted)
        #[arg(long, short)]
        depth: Option<usize>,
    },

    /// Show manifest counts and the top level of every axis
    Summary {
        /// YAML file or directory
        path: PathBuf,
    },

    /// List documents that are not valid manifests
    Invalid {
        /// YAML file or directory
        path: PathBuf,
    },

    /// Read active document paths from stdin and redraw all trees on change
    Follow {
        /// Document that is active before the first stdin event
        path: Option<PathBuf>,

        /// Levels to expand (all when omitted)
        #[arg(long, short)]
        depth: Option<usize>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or(match config.global.default_format {
        storage::OutputFormat::Text => OutputFormat::Text,
        storage::OutputFormat::Json => OutputFormat::Json,
    });
    let output = Output::new(format, cli.verbose);

    output.verbose("mtree starting");
    if let Some(root) = &config.project_root {
        output.verbose(&format!("Using project config at: {}", root.display()));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        match cli.command {
            Commands::Tree { path, axis, depth } => {
                let axis = axis.unwrap_or(config.project.default_axis);
                output.verbose_ctx("tree", &format!("Rendering {} axis for: {}", axis, path.display()));
                view::tree(&output, &config, &path, axis, depth).await
            }
            Commands::Summary { path } => {
                output.verbose_ctx("summary", &format!("Summarizing: {}", path.display()));
                view::summary(&output, &config, &path).await
            }
            Commands::Invalid { path } => {
                output.verbose_ctx("invalid", &format!("Listing invalid documents in: {}", path.display()));
                view::invalid(&output, &config, &path).await
            }
            Commands::Follow { path, depth } => {
                output.verbose_ctx("follow", "Reading active document paths from stdin");
                follow::run(&output, &config, path.as_deref(), depth).await
            }
        }
    })
}

/// Installs the logger; `--verbose` enables debug output for this crate,
/// `RUST_LOG` takes precedence
fn init_logging(verbose: bool) {
    let default_level = if verbose { "manifest_tree=debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
