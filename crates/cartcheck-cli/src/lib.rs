//! Cartcheck CLI library
//!
//! Command-line front end for the cartcheck storefront suite: argument
//! parsing, configuration layering, log setup and result reporting.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod runner;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, DriverArg, FormatArg, ListArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{
    format_result_line, render_list_json, render_list_text, summary_line, OutputFormat,
    ProgressReporter,
};
