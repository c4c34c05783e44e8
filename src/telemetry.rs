//! Structured logging setup for hosts embedding the core
//!
//! `RUST_LOG` overrides the configured level. Debug builds log pretty
//! terminal output; release builds log JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for `log_level`.
pub fn default_filter(log_level: &str) -> String {
    format!("{log_level},windwalker_core={log_level}")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_telemetry_with_level(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(false))
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .ok();
    }
}

pub fn init_telemetry() {
    init_telemetry_with_level("info");
}
