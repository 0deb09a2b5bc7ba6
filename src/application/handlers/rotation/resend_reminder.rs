//! ResendReminderHandler - repeats the reminder for the current obligor.
//!
//! When the current cycle was never announced (its scheduled delivery failed,
//! or no trigger has run yet), a delivered resend commits it the same way the
//! monthly trigger does. Otherwise state is left alone.

use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

use super::{DeliveryTargets, SharedRotation};
use crate::application::messages::ReminderTemplate;
use crate::domain::rotation::{DueMonth, Obligor, RotationEngine};
use crate::ports::{DeliveryError, Notifier};

#[derive(Debug, Clone)]
pub struct ResendReminderCommand {
    pub now: DateTime<FixedOffset>,
}

#[derive(Debug, Clone)]
pub struct ResendReminderResult {
    pub obligor: Obligor,
    pub month: DueMonth,
    /// Whether this delivery settled a pending cycle.
    pub committed: bool,
    pub persisted: bool,
}

pub struct ResendReminderHandler {
    rotation: SharedRotation,
    notifier: Arc<dyn Notifier>,
    targets: DeliveryTargets,
    template: Arc<ReminderTemplate>,
}

impl ResendReminderHandler {
    pub fn new(
        rotation: SharedRotation,
        notifier: Arc<dyn Notifier>,
        targets: DeliveryTargets,
        template: Arc<ReminderTemplate>,
    ) -> Self {
        Self {
            rotation,
            notifier,
            targets,
            template,
        }
    }

    pub async fn handle(
        &self,
        cmd: ResendReminderCommand,
    ) -> Result<ResendReminderResult, DeliveryError> {
        let mut current = self.rotation.lock().await;
        let engine = RotationEngine::new(self.rotation.roster());
        let obligor = engine.current_obligor(&current);
        let month = DueMonth::containing(cmd.now.date_naive());

        let group = self.targets.group.ok_or(DeliveryError::NoChannel)?;
        let text = self.template.reminder(&obligor.name, month);
        self.notifier.deliver(group, &text).await.map_err(|e| {
            tracing::warn!(obligor = %obligor.name, "Reminder resend failed: {}", e);
            e
        })?;

        let settled = engine.settle(&current);
        if settled == *current {
            tracing::info!(obligor = %obligor.name, month = %month, "Reminder resent");
            return Ok(ResendReminderResult {
                obligor,
                month,
                committed: false,
                persisted: true,
            });
        }

        tracing::info!(
            obligor = %obligor.name,
            month = %month,
            "Pending reminder delivered by resend, cycle committed"
        );
        let persisted = self.rotation.persist(&settled).await.is_ok();
        *current = settled;
        Ok(ResendReminderResult {
            obligor,
            month,
            committed: true,
            persisted,
        })
    }
}
