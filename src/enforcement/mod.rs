//! Per-chunk admission control for hanging displays.
//!
//! # Data Flow
//! ```text
//! host raises HangingPlaceEvent (main context)
//!     → listener.rs (bypass when unlimited, count qualifying entities)
//!     → limiter.rs (pure allow/deny decision)
//!     → listener.rs cancels the event and messages the actor on deny
//! ```

pub mod limiter;
pub mod listener;

pub use limiter::{evaluate, evaluate_with, Decision};
pub use listener::{count_hanging_displays, limit_reached_message, on_hanging_place};
