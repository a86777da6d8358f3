//! Logging initialization
//!
//! `RUST_LOG` always wins; otherwise the filter from configuration is used,
//! falling back to `info`.
//!
//! ```rust
//! use bllvm_chainparams::utils::init_logging;
//!
//! init_logging(Some("bllvm_chainparams=debug"));
//! ```

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Resolve the effective filter directive
pub fn filter_directive(filter: Option<&str>) -> String {
    match std::env::var("RUST_LOG") {
        Ok(env) if !env.is_empty() => env,
        _ => filter.unwrap_or(DEFAULT_FILTER).to_string(),
    }
}

fn env_filter(filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(filter_directive(filter)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber on stderr
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(filter: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(env_filter(filter))
        .try_init()
        .is_ok()
}

/// Install a JSON subscriber for log aggregation
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(env_filter(filter))
        .try_init()
        .is_ok()
}

/// Initialize logging from the `logging` section of [`crate::config::ParamsConfig`]
pub fn init_logging_from_config(config: Option<&LoggingConfig>) -> bool {
    let filter = config.and_then(|c| c.filter.as_deref());

    if config.map(|c| c.json_format).unwrap_or(false) {
        #[cfg(feature = "json-logging")]
        {
            return init_json_logging(filter);
        }
        #[cfg(not(feature = "json-logging"))]
        {
            tracing::warn!("json_format requested but the json-logging feature is disabled");
        }
    }
    init_logging(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_filter_precedence() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(filter_directive(None), "info");
        assert_eq!(filter_directive(Some("debug")), "debug");

        std::env::set_var("RUST_LOG", "trace");
        assert_eq!(filter_directive(Some("debug")), "trace");
        std::env::remove_var("RUST_LOG");
    }

    #[test]
    #[serial]
    fn test_second_init_is_rejected() {
        std::env::remove_var("RUST_LOG");
        init_logging(Some("warn"));
        assert!(!init_logging(Some("warn")));
    }
}
