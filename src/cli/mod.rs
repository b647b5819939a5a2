//! CLI module
//!
//! Command-line stand-in for the workflow host.
//!
//! # Commands
//!
//! - `check` - Test the API token
//! - `run` - Run an operation over a batch of items
//! - `operations` - List supported operations

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_items, parse_parameters, Runner};
