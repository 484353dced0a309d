//! Escribano CLI Library
//!
//! Command-line interface for Escriba: turns a recorded browser session
//! (one JSON action per line) into a scenario document, maps single
//! selectors, and checks existing documents.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod logging;
mod output;

pub use commands::{CheckArgs, Cli, ColorArg, Commands, GenerateArgs, SelectorArgs, SelectorFormat};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{default_filter, init_logging};
pub use output::StatusReporter;
