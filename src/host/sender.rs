//! Command senders and message delivery.

use std::collections::HashSet;
use std::sync::Mutex;

/// Anyone who can run a command or receive a message.
pub trait CommandSender {
    fn name(&self) -> &str;

    /// Interactive player session, as opposed to the console or automation.
    fn is_player(&self) -> bool;

    fn has_permission(&self, node: &str) -> bool;

    fn send_message(&self, message: &str);
}

/// A sender that queues its messages until the host drains them.
#[derive(Debug, Default)]
pub struct BufferedSender {
    name: String,
    player: bool,
    permissions: HashSet<String>,
    messages: Mutex<Vec<String>>,
}

impl BufferedSender {
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player: true,
            ..Self::default()
        }
    }

    pub fn console() -> Self {
        Self {
            name: "CONSOLE".to_string(),
            ..Self::default()
        }
    }

    pub fn with_permission(mut self, node: impl Into<String>) -> Self {
        self.permissions.insert(node.into());
        self
    }

    /// Remove and return every message delivered so far.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().expect("sender mutex poisoned"))
    }
}

impl CommandSender for BufferedSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_player(&self) -> bool {
        self.player
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.contains(node)
    }

    fn send_message(&self, message: &str) {
        self.messages
            .lock()
            .expect("sender mutex poisoned")
            .push(message.to_string());
    }
}
