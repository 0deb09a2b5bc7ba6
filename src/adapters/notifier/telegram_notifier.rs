//! Telegram implementation of the Notifier port.

use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::telegram::TelegramClient;
use crate::domain::foundation::ChatId;
use crate::ports::{DeliveryError, Notifier};

/// Delivers messages through the Bot API.
pub struct TelegramNotifier {
    client: Arc<TelegramClient>,
}

impl TelegramNotifier {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError> {
        match self.client.send_message(chat, text).await {
            Ok(()) => {
                tracing::debug!(chat = %chat, "Message delivered");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(chat = %chat, "Message delivery failed: {}", e);
                Err(e)
            }
        }
    }
}
