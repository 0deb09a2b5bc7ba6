//! Payrota - monthly payment rotation for a shared subscription.
//!
//! A fixed roster takes turns paying. Once a month the next participant is
//! announced to a group chat; the rotation only moves forward when that
//! announcement is delivered. An admin confirms payments and can correct
//! the rotation through private chat commands.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
