//! Rotation domain module.
//!
//! The roster, the persisted rotation state, and the pure rules that move a
//! shared monthly obligation from one participant to the next.

mod calendar;
mod engine;
mod errors;
mod phase;
mod roster;
mod state;

pub use calendar::DueMonth;
pub use engine::{DueDate, Obligor, RotationEngine};
pub use errors::RotationError;
pub use phase::CyclePhase;
pub use roster::{Roster, RosterEntry};
pub use state::{RotationState, StateRecord, NEVER_SETTLED, STATE_FORMAT_VERSION};
