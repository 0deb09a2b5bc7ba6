//! In-Memory State Store Adapter
//!
//! Holds the rotation record in memory with the same validation rules as
//! the file store. Useful for testing and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::rotation::{Roster, RotationState, StateRecord};
use crate::ports::{StateStore, StateStoreError};

/// In-memory storage for the rotation state
#[derive(Debug, Clone)]
pub struct InMemoryStateStore {
    roster: Arc<Roster>,
    record: Arc<RwLock<Option<StateRecord>>>,
    fail_writes: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
}

impl InMemoryStateStore {
    /// Create an empty store
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            record: Arc::new(RwLock::new(None)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            save_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a store pre-seeded with a raw record (possibly invalid)
    pub fn with_record(roster: Arc<Roster>, record: StateRecord) -> Self {
        Self {
            record: Arc::new(RwLock::new(Some(record))),
            ..Self::new(roster)
        }
    }

    /// Make subsequent saves fail with an I/O error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The raw record last written, if any
    pub async fn stored_record(&self) -> Option<StateRecord> {
        self.record.read().await.clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> RotationState {
        let record = self.record.read().await;
        match record.as_ref() {
            None => RotationState::initial(&self.roster),
            Some(record) => RotationState::from_record(&self.roster, record).unwrap_or_else(|e| {
                tracing::error!("Invalid stored state, using defaults: {}", e);
                RotationState::initial(&self.roster)
            }),
        }
    }

    async fn save(&self, state: &RotationState) -> Result<(), StateStoreError> {
        state.validate(&self.roster)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StateStoreError::IoError("simulated write failure".to_string()));
        }
        *self.record.write().await = Some(state.to_record());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
