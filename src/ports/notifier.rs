//! Notifier port - delivers formatted text to a chat and reports the outcome.

use async_trait::async_trait;

use crate::domain::foundation::{ChatId, ErrorCode};

/// Why a message could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// No destination configured for this message.
    #[error("No destination chat configured")]
    NoChannel,

    /// The transport could not be reached or timed out.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The transport answered but refused the message.
    #[error("Rejected by transport ({status}): {description}")]
    Rejected { status: u16, description: String },
}

impl DeliveryError {
    pub fn transport(message: impl Into<String>) -> Self {
        DeliveryError::Transport(message.into())
    }

    pub fn rejected(status: u16, description: impl Into<String>) -> Self {
        DeliveryError::Rejected {
            status,
            description: description.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::DeliveryFailed
    }
}

/// Port for sending messages to participants.
///
/// Delivery is awaited to completion; timeouts belong to the adapter.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` (HTML formatted) to `chat`.
    async fn deliver(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError>;
}
