//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod rotation;

pub use rotation::{
    AdvanceCycleCommand, AdvanceCycleHandler, AdvanceCycleResult, DeliveryTargets,
    GetDueDateHandler, GetDueDateQuery, GetStatusHandler, GetStatusQuery, ListRosterHandler,
    MarkPaidCommand, MarkPaidHandler, MarkPaidResult, OverrideCycleCommand, OverrideCycleHandler,
    OverrideCycleResult, ResendReminderCommand, ResendReminderHandler, ResendReminderResult,
    SharedRotation, StatusView,
};
