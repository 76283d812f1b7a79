//! Structured logging.
//!
//! Uses `tracing` throughout; the subscriber honours `RUST_LOG` and falls
//! back to the directive passed by the host.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "frame_chunk_limit=info";

/// Install the global subscriber. Call once, before `on_enable`.
pub fn init(default_directive: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
