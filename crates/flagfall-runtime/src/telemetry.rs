//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::{RuntimeError, RuntimeResult};

/// Output format for [`init_logging`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install a global fmt subscriber. `RUST_LOG` overrides the `info` default.
/// Fails if a global subscriber is already set.
pub fn init_logging(format: LogFormat) -> RuntimeResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| RuntimeError::Logging(e.to_string()))
}
