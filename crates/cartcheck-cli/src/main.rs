//! Cartcheck CLI: end-to-end checks for an OpenCart-style storefront
//!
//! ## Usage
//!
//! ```bash
//! cartcheck run --base-url http://shop.test/          # Run every scenario
//! cartcheck run -s buying_process -p 2                 # One scenario, one product
//! cartcheck run --driver mock --format json            # No browser, JSON results
//! cartcheck list                                       # Show the catalog
//! cartcheck config -c store.yaml                       # Show resolved settings
//! ```

use cartcheck_cli::{logging, runner, Cli, CliConfig, CliError, CliResult, Commands, Verbosity};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(&config);

    match cli.command {
        Commands::Run(args) => {
            let results = runner::run_scenarios(&config, &args)?;
            if results.all_passed() {
                Ok(())
            } else {
                Err(CliError::ScenariosFailed {
                    failed: results.failed_count() + results.skipped,
                    total: results.total() + results.skipped,
                })
            }
        }
        Commands::List(args) => runner::list_scenarios(&args),
        Commands::Config(args) => runner::show_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_log_json(cli.log_json)
}
