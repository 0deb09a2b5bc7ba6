//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, state machine trait, errors)
//! - `rotation` - Roster, rotation state, and the rotation engine

pub mod foundation;
pub mod rotation;
