//! Metrics collection and exposition.
//!
//! # Metrics
//! - `frame_limit_placements_total` (counter): placement decisions by outcome
//! - `frame_limit_reloads_total` (counter): config reloads by outcome
//! - `frame_limit_watcher_signals_total` (counter): signals emitted by the watcher
//! - `frame_limit_current` (gauge): limit currently enforced, -1 for unlimited

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::config::FrameLimit;
use crate::enforcement::Decision;
use crate::lifecycle::scheduler::ConfigSignal;

/// Install the Prometheus recorder and its HTTP scrape endpoint.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_placement(decision: Decision) {
    let outcome = match decision {
        Decision::Allow => "allow",
        Decision::Deny => "deny",
    };
    ::metrics::counter!("frame_limit_placements_total", "decision" => outcome).increment(1);
}

pub fn record_reload(outcome: &'static str) {
    ::metrics::counter!("frame_limit_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_watcher_signal(signal: &ConfigSignal) {
    let kind = match signal {
        ConfigSignal::Reload { .. } => "reload",
        ConfigSignal::Removed { .. } => "removed",
    };
    ::metrics::counter!("frame_limit_watcher_signals_total", "kind" => kind).increment(1);
}

pub fn record_limit(limit: FrameLimit) {
    ::metrics::gauge!("frame_limit_current").set(f64::from(limit.get()));
}
