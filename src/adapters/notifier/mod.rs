//! Notifier adapters.

mod mock_notifier;
mod telegram_notifier;

pub use mock_notifier::MockNotifier;
pub use telegram_notifier::TelegramNotifier;
