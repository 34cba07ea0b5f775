//! Tracing initialization and subscriber setup.
//!
//! Builds a registry with an [`EnvFilter`] and a formatting layer writing to
//! stderr, so that stdout stays free for command output.

use crate::TableConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

fn build_filter(config: &TableConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initializes the global tracing subscriber.
///
/// # Parameters
///
/// * `config` - Table configuration containing the `trace_level` option
///
/// # Trace Level Resolution
///
/// Level is determined by:
/// 1. `RUST_LOG` if set and valid
/// 2. `config.trace_level` if set and valid
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// Idempotent: safe to call multiple times. Only the first call installs a
/// subscriber; later calls, or calls after the host installed its own, are
/// silently ignored.
///
/// # Example
///
/// ```rust
/// use complete_table::observability::init_tracing;
/// use complete_table::TableConfig;
///
/// let config = TableConfig {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &TableConfig) {
    let subscriber = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    let _ = subscriber.try_init();
}
