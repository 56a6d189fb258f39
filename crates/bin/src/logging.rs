//! Console logging setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging settings read from the environment.
#[derive(Debug, Clone)]
pub(crate) struct LoggingConfig {
    pub(crate) log_level: String,
}

impl LoggingConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Install the global subscriber. Log lines go to stderr, beside the progress bar.
pub(crate) fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.log_level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
