//! In-process Notifier that records deliveries.
//!
//! Used by tests and local dry runs. Failures can be switched on for every
//! chat or for selected chats.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::foundation::ChatId;
use crate::ports::{DeliveryError, Notifier};

#[derive(Debug, Default)]
pub struct MockNotifier {
    delivered: Mutex<Vec<(ChatId, String)>>,
    attempts: Mutex<usize>,
    fail_all: Mutex<bool>,
    failing_chats: Mutex<HashSet<ChatId>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails.
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut fail_all) = self.fail_all.lock() {
            *fail_all = failing;
        }
    }

    /// Make deliveries to `chat` fail.
    pub fn fail_chat(&self, chat: ChatId) {
        if let Ok(mut chats) = self.failing_chats.lock() {
            chats.insert(chat);
        }
    }

    /// Successful deliveries, oldest first.
    pub fn delivered(&self) -> Vec<(ChatId, String)> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn delivered_to(&self, chat: ChatId) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter(|(c, _)| *c == chat)
            .map(|(_, text)| text)
            .collect()
    }

    /// Every call to `deliver`, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|a| *a).unwrap_or_default()
    }

    fn should_fail(&self, chat: ChatId) -> bool {
        let all = self.fail_all.lock().map(|f| *f).unwrap_or(false);
        let this_chat = self
            .failing_chats
            .lock()
            .map(|chats| chats.contains(&chat))
            .unwrap_or(false);
        all || this_chat
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn deliver(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }
        if self.should_fail(chat) {
            return Err(DeliveryError::transport("simulated delivery failure"));
        }
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push((chat, text.to_string()));
        }
        Ok(())
    }
}
