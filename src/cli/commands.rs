//! CLI commands and argument parsing

use crate::auth::TOKEN_ENV_VAR;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aitable.ai workflow node CLI
#[derive(Parser, Debug)]
#[command(name = "aitable-node")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Node configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Aitable API token (overrides the config file)
    #[arg(long, global = true, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the API token against the spaces endpoint
    Check,

    /// Run an operation over a batch of input items
    Run {
        /// Parameters file: `{"parameters": {...}, "items": [...]}` or a bare parameters object
        #[arg(short, long, conflicts_with = "params_json")]
        params: Option<PathBuf>,

        /// Inline parameters JSON, same shape as --params
        #[arg(long)]
        params_json: Option<String>,

        /// Per-item parameter overrides (JSON array), replaces `items` from --params
        #[arg(long)]
        items: Option<PathBuf>,

        /// Report failing items as records and keep going
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// List supported operations and their parameters
    Operations,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
