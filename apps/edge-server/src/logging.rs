use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Installs the global subscriber. Output goes to stderr so stdout stays
/// free for `--print-config` and `check`.
///
/// `RUST_LOG` takes precedence over `logging.level`. Records emitted
/// through the `log` facade are bridged into `tracing`.
///
/// # Errors
/// Fails if the level is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cfg.level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {e}", cfg.level))?,
    };

    let (text, json) = match cfg.format {
        LogFormat::Text => (
            Some(fmt::layer().with_writer(std::io::stderr).with_target(true)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
