//! In-session command surface.

pub mod framechunk;

pub use framechunk::{execute, CommandOutcome, COMMAND_NAME, SET_PERMISSION};
