//! Foundation module - Shared domain primitives.
//!
//! Identifiers, the state machine trait, and error types shared by the
//! rotation domain and the adapters.

mod errors;
mod ids;
mod state_machine;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{ChatId, UserId};
pub use state_machine::StateMachine;
