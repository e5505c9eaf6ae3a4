//! Scrivener CLI library - command-line surface over the generation
//! pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod draft;
pub mod error;
pub mod output;
pub mod stages;

pub use cli::{Cli, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
