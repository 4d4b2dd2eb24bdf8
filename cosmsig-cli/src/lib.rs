//! Library half of the `cosmsig` command-line tool.
//!
//! # Modules
//!
//! - [`commands`] - Command execution
//! - [`config`] - Command-line and environment configuration
//! - [`error`] - CLI error type
//! - [`input`] - Literal and `@path` input decoding

pub mod commands;
pub mod config;
pub mod error;
pub mod input;

pub use commands::run;
pub use config::{Cli, Command, Encoding};
pub use error::CliError;
