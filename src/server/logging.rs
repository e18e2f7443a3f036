use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, McpConfig};

/// Installs the global tracing subscriber for a server process.
///
/// Logs go to stderr because stdout carries the protocol when the server
/// runs on stdio. `RUST_LOG` wins over the configured level when set.
/// Calling this twice is a no-op.
pub fn setup_logging(config: &McpConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let init_result = match config.log_format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init(),
    };

    if init_result.is_err() {
        tracing::debug!("global tracing subscriber was already installed");
    }
}
