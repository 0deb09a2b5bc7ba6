//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers own the rotation workflow; the scheduler and the command
//! surface are the two ways in.

pub mod commands;
pub mod handlers;
pub mod messages;
pub mod scheduler;

pub use commands::{ChatKind, Command, CommandHandlers, CommandSurface, IncomingCommand};
pub use messages::ReminderTemplate;
pub use scheduler::{MonthlySchedule, MonthlyScheduler};
