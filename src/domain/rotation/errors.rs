//! Rotation-specific error types.
//!
//! | Error | Policy |
//! |-------|--------|
//! | NotFound | user-visible rejection, no state change |
//! | AlreadyPaid | informational, no state change |
//! | InvalidState | recovered locally by falling back to defaults |

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};

/// Errors raised by rotation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    /// The requested name is not on the roster.
    #[error("'{0}' is not on the roster")]
    NotFound(String),

    /// Payment for the current cycle was already confirmed.
    #[error("Payment from {name} is already recorded")]
    AlreadyPaid { name: String },

    /// A state record violates a structural invariant.
    #[error("Invalid rotation state: {0}")]
    InvalidState(#[from] ValidationError),
}

impl RotationError {
    pub fn not_found(name: impl Into<String>) -> Self {
        RotationError::NotFound(name.into())
    }

    pub fn already_paid(name: impl Into<String>) -> Self {
        RotationError::AlreadyPaid { name: name.into() }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RotationError::NotFound(_) => ErrorCode::ParticipantNotFound,
            RotationError::AlreadyPaid { .. } => ErrorCode::AlreadyPaid,
            RotationError::InvalidState(_) => ErrorCode::InvalidState,
        }
    }
}
