//! Rotation command and query handlers.

mod advance_cycle;
mod get_due_date;
mod get_status;
mod list_roster;
mod mark_paid;
mod override_cycle;
mod resend_reminder;
mod shared_rotation;

#[cfg(test)]
pub(crate) mod test_support;

pub use advance_cycle::{AdvanceCycleCommand, AdvanceCycleHandler, AdvanceCycleResult};
pub use get_due_date::{GetDueDateHandler, GetDueDateQuery};
pub use get_status::{GetStatusHandler, GetStatusQuery, StatusView};
pub use list_roster::ListRosterHandler;
pub use mark_paid::{MarkPaidCommand, MarkPaidHandler, MarkPaidResult};
pub use override_cycle::{OverrideCycleCommand, OverrideCycleHandler, OverrideCycleResult};
pub use resend_reminder::{ResendReminderCommand, ResendReminderHandler, ResendReminderResult};
pub use shared_rotation::SharedRotation;

use crate::domain::foundation::ChatId;

/// Where announcements and operator reports go.
///
/// Either side may be unset; sends to an unset target fail with
/// `DeliveryError::NoChannel`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryTargets {
    pub group: Option<ChatId>,
    pub admin: Option<ChatId>,
}
