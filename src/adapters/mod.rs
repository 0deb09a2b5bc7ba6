//! Adapters - Implementations of port interfaces.
//!
//! - `storage` - rotation state persistence (JSON file, in-memory)
//! - `notifier` - message delivery (Telegram, recording mock)
//! - `telegram` - Bot API client and the command update loop

pub mod notifier;
pub mod storage;
pub mod telegram;

pub use notifier::{MockNotifier, TelegramNotifier};
pub use storage::{FileStateStore, InMemoryStateStore};
pub use telegram::{TelegramClient, TelegramClientConfig, UpdatePoller, UpdatePollerConfig};
