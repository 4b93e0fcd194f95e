//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level and format from config and environment

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hash_router={}", config.log_level).into());

    let compact = config.log_format == LogFormat::Compact;

    tracing_subscriber::registry()
        .with(filter)
        .with(compact.then(|| tracing_subscriber::fmt::layer().compact()))
        .with((!compact).then(tracing_subscriber::fmt::layer))
        .try_init()
}
