//! Tracing initialisation for hosts embedding the engine

use crate::config::LogFormat;
use crate::error::{Result, SdkError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "riskwatch_sdk=info,riskwatch_runtime=info,riskwatch_repository=info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides `default_filter`. Records emitted through the `log`
/// facade are forwarded as well. Fails if a subscriber is already installed.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    installed.map_err(|e| SdkError::ConfigError(format!("Failed to initialize tracing: {}", e)))
}
