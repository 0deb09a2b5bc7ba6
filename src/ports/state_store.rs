//! StateStore port - durable home of the rotation state.
//!
//! `load` never fails outward: a missing, unreadable, or invalid record is
//! logged by the adapter and replaced with the default state. `save` refuses
//! states that break structural invariants so a bad record never overwrites
//! a good one.

use async_trait::async_trait;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::rotation::RotationState;

/// Errors that can occur while saving rotation state.
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("Refused to save invalid state: {0}")]
    Rejected(#[from] ValidationError),

    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl StateStoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StateStoreError::Rejected(_) => ErrorCode::InvalidState,
            StateStoreError::SerializationFailed(_) | StateStoreError::IoError(_) => {
                ErrorCode::PersistenceFailed
            }
        }
    }
}

/// Port for loading and saving the single rotation record.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the rotation state, falling back to the default state.
    async fn load(&self) -> RotationState;

    /// Replace the stored state with `state`.
    ///
    /// # Errors
    ///
    /// - `Rejected` if `state` violates a structural invariant; nothing is written
    /// - `IoError` / `SerializationFailed` if the write itself fails
    async fn save(&self, state: &RotationState) -> Result<(), StateStoreError>;
}
