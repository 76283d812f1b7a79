//! `/framechunk [limit]`: show or change the frame limit.
//!
//! Checks run in this order: interactive player, permission, argument count,
//! argument value. Any failed check reports a message and changes nothing.

use crate::config::store::{ConfigStore, SetLimitError};
use crate::config::FrameLimit;
use crate::host::CommandSender;

pub const COMMAND_NAME: &str = "framechunk";
pub const SET_PERMISSION: &str = "framechunklimit.set";

const USAGE: &str = "Usage: /framechunk <limit>";

/// What the command did, for hosts that want more than the chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    NotAPlayer,
    PermissionDenied,
    ShowedCurrent(FrameLimit),
    UsageError,
    InvalidLimit,
    Updated(FrameLimit),
    PersistFailed,
}

pub fn execute(store: &mut ConfigStore, sender: &dyn CommandSender, args: &[&str]) -> CommandOutcome {
    if !sender.is_player() {
        sender.send_message("This command can only be used by a player.");
        return CommandOutcome::NotAPlayer;
    }
    if !sender.has_permission(SET_PERMISSION) {
        sender.send_message("You do not have permission to use this command.");
        return CommandOutcome::PermissionDenied;
    }

    let arg = match args {
        [] => {
            let current = store.get();
            sender.send_message(&format!("Current limit: {}. {}", current, USAGE));
            return CommandOutcome::ShowedCurrent(current);
        }
        [arg] => *arg,
        _ => {
            sender.send_message(USAGE);
            return CommandOutcome::UsageError;
        }
    };

    let Ok(value) = arg.trim().parse::<i64>() else {
        sender.send_message("The limit must be a non-negative integer or -1 for unlimited.");
        return CommandOutcome::InvalidLimit;
    };

    match store.set_and_persist(value) {
        Ok(limit) => {
            tracing::info!(player = %sender.name(), limit = %limit, "Frame limit changed by command");
            sender.send_message(&format!("Global frame chunk limit has been set to {}.", limit));
            CommandOutcome::Updated(limit)
        }
        Err(SetLimitError::Invalid(_)) => {
            sender.send_message("The limit must be a non-negative integer or -1 for unlimited.");
            CommandOutcome::InvalidLimit
        }
        Err(SetLimitError::Persist(e)) => {
            tracing::error!(player = %sender.name(), error = %e, "Failed to save frame limit");
            sender.send_message("Could not save the frame limit; it was not changed.");
            CommandOutcome::PersistFailed
        }
    }
}
