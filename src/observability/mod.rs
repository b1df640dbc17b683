//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (tx_id, round, address)
//!     → logging.rs subscriber → stderr
//!
//! User-facing progress lines are printed by the binary on stdout.
//! ```

pub mod logging;

pub use logging::{init_logging, DEFAULT_LOG_LEVEL};
