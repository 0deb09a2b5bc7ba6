//! SharedRotation - the process-wide rotation record and its store.
//!
//! Every mutation runs with the lock held, which serializes the scheduler
//! and operator commands. Saves happen after each mutation; a failed save is
//! logged and the in-memory state stays authoritative until the next save
//! succeeds.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::rotation::{Roster, RotationState};
use crate::ports::{StateStore, StateStoreError};

/// Owned rotation state shared by the scheduler and command handlers.
#[derive(Clone)]
pub struct SharedRotation {
    roster: Arc<Roster>,
    state: Arc<Mutex<RotationState>>,
    store: Arc<dyn StateStore>,
}

impl SharedRotation {
    /// Load the state from `store` once, at process start.
    pub async fn load(roster: Arc<Roster>, store: Arc<dyn StateStore>) -> Self {
        let state = store.load().await;
        Self {
            roster,
            state: Arc::new(Mutex::new(state)),
            store,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Enter the critical section.
    pub async fn lock(&self) -> MutexGuard<'_, RotationState> {
        self.state.lock().await
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> RotationState {
        self.state.lock().await.clone()
    }

    /// Save `state`, logging failures.
    pub async fn persist(&self, state: &RotationState) -> Result<(), StateStoreError> {
        let result = self.store.save(state).await;
        if let Err(e) = &result {
            tracing::error!(
                code = %e.code(),
                last_settled = state.last_settled_index(),
                obligor = %state.current_name(),
                "Failed to persist rotation state: {}",
                e
            );
        }
        result
    }
}
