//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config or `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr; stdout carries the progress messages
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when nothing else is configured, or the configured
/// level never got loaded.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` if set and valid, else `configured`.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(configured))
}

/// Filter from the configured directives, falling back to the default level.
pub fn configured_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; returns `false` when a subscriber was
/// already installed and this call changed nothing.
pub fn init_logging(configured: &str) -> bool {
    let result = tracing_subscriber::registry()
        .with(build_filter(configured))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_ok() {
        tracing::debug!(level = %configured, "Logging initialized");
    }
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_init_after_setup_is_a_no_op() {
        init_logging("info");
        assert!(!init_logging(DEFAULT_LOG_LEVEL));
    }

    #[test]
    fn test_configured_filter_keeps_directives() {
        let filter = configured_filter("asa_mint=debug,reqwest=warn");
        let rendered = filter.to_string();
        assert!(rendered.contains("asa_mint=debug"));
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn test_invalid_level_falls_back_to_default() {
        assert!(EnvFilter::try_new("asa_mint=loudest").is_err());
        assert_eq!(configured_filter("asa_mint=loudest").to_string(), DEFAULT_LOG_LEVEL);
    }
}
