//! Telegram Bot API adapters.

mod client;
mod update_poller;

pub use client::{ApiChat, ApiMessage, ApiUser, TelegramClient, TelegramClientConfig, Update};
pub use update_poller::{UpdatePoller, UpdatePollerConfig};
