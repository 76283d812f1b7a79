//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle, watcher, store, enforcement produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//! ```
//!
//! Log lines and metrics are observability only; no decision depends on them.

pub mod logging;
pub mod metrics;
