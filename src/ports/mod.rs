//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the rotation core and the outside world. Adapters implement these ports.
//!
//! - `StateStore` - durable rotation state
//! - `Notifier` - message delivery to a chat

mod notifier;
mod state_store;

pub use notifier::{DeliveryError, Notifier};
pub use state_store::{StateStore, StateStoreError};
