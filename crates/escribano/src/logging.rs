//! Log subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, Verbosity};

/// Install the stderr log subscriber. `RUST_LOG` wins over the verbosity
/// flags. Returns `false` if a subscriber was already installed.
pub fn init_logging(config: &CliConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(config.verbosity)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::new(verbosity.log_directive())
}
