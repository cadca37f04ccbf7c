//! Log subscriber setup.
//!
//! Logs go to stderr so `--format json` output on stdout stays parseable.
//! `RUST_LOG` wins over the verbosity flags.

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the verbosity default
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()))
}

/// Install the global subscriber; a second call is a no-op
pub fn init(config: &CliConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder
            .with_ansi(config.color.should_color())
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
