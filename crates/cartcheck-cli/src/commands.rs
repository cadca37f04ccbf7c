//! CLI command definitions using clap

use cartcheck::{ProductId, ScenarioId};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cartcheck: end-to-end checks for an OpenCart-style storefront cart
#[derive(Parser, Debug)]
#[command(name = "cartcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against a storefront
    Run(RunArgs),

    /// List the scenario catalog
    List(ListArgs),

    /// Print the resolved configuration as YAML
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Storefront root URL (overrides file and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Scenarios to run (repeatable; default: all)
    #[arg(short, long = "scenario")]
    pub scenarios: Vec<ScenarioId>,

    /// Catalog positions to run per-product scenarios for (repeatable; default: 1-4)
    #[arg(short, long = "product")]
    pub products: Vec<ProductId>,

    /// Keep only scenarios whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop at the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Which driver to run against
    #[arg(long, default_value = "chromium")]
    pub driver: DriverArg,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Element wait timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Result format on stdout
    #[arg(long, default_value = "text")]
    pub format: FormatArg,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list per-product scenarios for these catalog positions
    #[arg(short, long = "product")]
    pub products: Vec<ProductId>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML configuration file to resolve
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ignore `CARTCHECK_*` environment overrides
    #[arg(long)]
    pub no_env: bool,
}

/// Driver selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Chromium over CDP
    #[default]
    Chromium,
    /// Built-in in-memory storefront
    Mock,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
