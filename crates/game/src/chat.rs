//! Sector chat: the recent-message log shown to the pilot.

use engine_core::{ListenerId, Observers};
use procgen::SystemId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use time::OffsetDateTime;

use crate::save::lenient_system_id;

/// Messages kept in the log; older ones fall off the front.
pub const MAX_CHAT_MESSAGES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    /// Unix milliseconds.
    pub timestamp: i64,
    /// System the sender was in.
    #[serde(deserialize_with = "lenient_system_id")]
    pub system_id: SystemId,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>, system_id: SystemId, sent_at: OffsetDateTime) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp: (sent_at.unix_timestamp_nanos() / 1_000_000) as i64,
            system_id,
        }
    }

    /// Two messages from one sender at one instant are the same message.
    fn same_as(&self, other: &ChatMessage) -> bool {
        self.timestamp == other.timestamp && self.sender == other.sender
    }
}

/// Bounded, duplicate-free message log.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    observers: Observers<ChatLog>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest first.
    pub fn messages(&self) -> &VecDeque<ChatMessage> {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages sent from `system`.
    pub fn in_system(&self, system: SystemId) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(move |m| m.system_id == system)
    }

    pub fn subscribe(&mut self, listener: impl Fn(&ChatLog) + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Append `message` unless one with the same timestamp and sender is
    /// already held. Listeners hear only about real additions.
    pub fn add_message(&mut self, message: ChatMessage) -> bool {
        if !self.push_unique(message) {
            return false;
        }
        self.observers.notify(self);
        true
    }

    /// Add a batch, notifying once if anything was new. Returns how many
    /// were added.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) -> usize {
        let mut added = 0;
        for message in messages {
            if self.push_unique(message) {
                added += 1;
            }
        }
        if added > 0 {
            self.observers.notify(self);
        }
        added
    }

    fn push_unique(&mut self, message: ChatMessage) -> bool {
        if self.messages.iter().any(|m| m.same_as(&message)) {
            log::trace!("Duplicate chat message from {} dropped", message.sender);
            return false;
        }
        self.messages.push_back(message);
        while self.messages.len() > MAX_CHAT_MESSAGES {
            self.messages.pop_front();
        }
        true
    }
}
