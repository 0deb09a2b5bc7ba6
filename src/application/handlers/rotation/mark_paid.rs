//! MarkPaidHandler - operator confirms the current obligor has paid.
//!
//! The flag is saved before the group hears about it. The announcement is
//! best-effort; its outcome is returned so the operator can be told.

use std::sync::Arc;

use super::{DeliveryTargets, SharedRotation};
use crate::application::messages;
use crate::domain::foundation::UserId;
use crate::domain::rotation::{Obligor, RotationEngine, RotationError};
use crate::ports::{DeliveryError, Notifier};

#[derive(Debug, Clone)]
pub struct MarkPaidCommand {
    pub operator: UserId,
}

#[derive(Debug, Clone)]
pub struct MarkPaidResult {
    pub obligor: Obligor,
    pub persisted: bool,
    /// Outcome of the group announcement.
    pub announcement: Result<(), DeliveryError>,
}

pub struct MarkPaidHandler {
    rotation: SharedRotation,
    notifier: Arc<dyn Notifier>,
    targets: DeliveryTargets,
}

impl MarkPaidHandler {
    pub fn new(
        rotation: SharedRotation,
        notifier: Arc<dyn Notifier>,
        targets: DeliveryTargets,
    ) -> Self {
        Self {
            rotation,
            notifier,
            targets,
        }
    }

    pub async fn handle(&self, cmd: MarkPaidCommand) -> Result<MarkPaidResult, RotationError> {
        let (obligor, persisted) = {
            let mut current = self.rotation.lock().await;
            let engine = RotationEngine::new(self.rotation.roster());

            // 1. Flip the flag; a second confirmation is reported, not applied
            let next = engine.mark_paid(&current).map_err(|e| {
                tracing::info!(operator = %cmd.operator, "{}", e);
                e
            })?;

            // 2. Persist
            let persisted = self.rotation.persist(&next).await.is_ok();
            let obligor = engine.current_obligor(&next);
            *current = next;
            (obligor, persisted)
        };

        tracing::info!(
            operator = %cmd.operator,
            obligor = %obligor.name,
            "Payment confirmed"
        );

        // 3. Tell the group
        let text = messages::payment_confirmed_announcement(&obligor.name);
        let announcement = match self.targets.group {
            Some(group) => self.notifier.deliver(group, &text).await,
            None => Err(DeliveryError::NoChannel),
        };
        if let Err(e) = &announcement {
            tracing::warn!(obligor = %obligor.name, "Payment announcement not delivered: {}", e);
        }

        Ok(MarkPaidResult {
            obligor,
            persisted,
            announcement,
        })
    }
}
