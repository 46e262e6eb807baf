//! Tracing subscriber setup. Logs go to stderr so stdout stays machine-readable.

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level;
/// `verbose` forces debug for this binary and the engine.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<(), LoggingError> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !verbose => filter,
        _ => EnvFilter::try_new(format!("slotctl={level},timeslot_engine={level}"))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().pretty().with_writer(std::io::stderr)),
        )?,
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_writer(std::io::stderr),
            ),
        )?,
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        )?,
    }

    Ok(())
}
