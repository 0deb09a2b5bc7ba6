//! Storage Adapters
//!
//! Implementations of the StateStore port for persisting the rotation state.
//!
//! ## Available Adapters
//!
//! - **FileStateStore** - Stores state as a JSON file on disk
//! - **InMemoryStateStore** - Stores state in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileStateStore, InMemoryStateStore};
//!
//! // Production: file-based storage
//! let store = FileStateStore::new("/data/bot_state.json", roster.clone());
//!
//! // Testing: in-memory storage
//! let store = InMemoryStateStore::new(roster);
//! ```

mod file_state_store;
mod in_memory_state_store;

pub use file_state_store::FileStateStore;
pub use in_memory_state_store::InMemoryStateStore;
