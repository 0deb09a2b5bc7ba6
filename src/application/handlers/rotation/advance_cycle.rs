//! AdvanceCycleHandler - runs one monthly trigger.
//!
//! The next obligor is computed and announced to the group. Only a delivered
//! announcement settles the rotation pointer; after a failed delivery the
//! pointer stays where it was, so the following trigger announces the same
//! participant again. The admin is told about failures on a best-effort basis.
//!
//! The whole trigger runs inside the rotation lock, so operator commands
//! wait for it to finish.

use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

use super::{DeliveryTargets, SharedRotation};
use crate::application::messages::{self, ReminderTemplate};
use crate::domain::foundation::StateMachine;
use crate::domain::rotation::{CyclePhase, DueMonth, Obligor, RotationEngine, RotationState};
use crate::ports::{DeliveryError, Notifier};

/// One scheduled (or manual) trigger.
#[derive(Debug, Clone)]
pub struct AdvanceCycleCommand {
    /// Local time the trigger fired; selects the month named in the reminder.
    pub fired_at: DateTime<FixedOffset>,
}

/// What a trigger did.
#[derive(Debug, Clone)]
pub struct AdvanceCycleResult {
    /// Participant announced (or whose announcement failed).
    pub obligor: Obligor,
    pub month: DueMonth,
    /// `Committed` or `NotifyFailed`.
    pub outcome: CyclePhase,
    pub delivery_error: Option<DeliveryError>,
    /// Whether the resulting state reached the store.
    pub persisted: bool,
    /// State held in memory after the trigger.
    pub state: RotationState,
}

impl AdvanceCycleResult {
    pub fn is_committed(&self) -> bool {
        self.outcome == CyclePhase::Committed
    }
}

pub struct AdvanceCycleHandler {
    rotation: SharedRotation,
    notifier: Arc<dyn Notifier>,
    targets: DeliveryTargets,
    template: Arc<ReminderTemplate>,
}

impl AdvanceCycleHandler {
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

    pub async fn handle(&self, cmd: AdvanceCycleCommand) -> AdvanceCycleResult {
        let mut current = self.rotation.lock().await;
        let engine = RotationEngine::new(self.rotation.roster());
        let mut phase = CyclePhase::Idle;

        // 1. Pick the candidate from the settled pointer
        phase = enter(phase, CyclePhase::Advancing);
        let working = engine.advance(&current);
        let obligor = engine.current_obligor(&working);
        let month = DueMonth::containing(cmd.fired_at.date_naive());

        // 2. Announce to the group
        phase = enter(phase, CyclePhase::Notifying);
        let text = self.template.reminder(&obligor.name, month);
        let delivery = match self.targets.group {
            Some(group) => self.notifier.deliver(group, &text).await,
            None => Err(DeliveryError::NoChannel),
        };

        // 3. Commit only on delivery
        let (next, delivery_error) = match delivery {
            Ok(()) => {
                phase = enter(phase, CyclePhase::Committed);
                tracing::info!(
                    obligor = %obligor.name,
                    month = %month,
                    "Reminder delivered, cycle committed"
                );
                (engine.settle(&working), None)
            }
            Err(e) => {
                phase = enter(phase, CyclePhase::NotifyFailed);
                tracing::error!(
                    code = %e.code(),
                    obligor = %obligor.name,
                    month = %month,
                    "Reminder delivery failed, rotation pointer unchanged: {}",
                    e
                );
                self.report_failure(&e).await;
                (working, Some(e))
            }
        };

        // 4. Persist, then publish in memory regardless of the save outcome
        let persisted = self.rotation.persist(&next).await.is_ok();
        *current = next.clone();

        let outcome = phase;
        enter(phase, CyclePhase::Idle);

        AdvanceCycleResult {
            obligor,
            month,
            outcome,
            delivery_error,
            persisted,
            state: next,
        }
    }

    async fn report_failure(&self, error: &DeliveryError) {
        let Some(admin) = self.targets.admin else {
            tracing::warn!("No admin chat configured, delivery failure not reported");
            return;
        };
        let group = self
            .targets
            .group
            .map(|g| g.to_string())
            .unwrap_or_else(|| "(not configured)".to_string());
        let report = messages::delivery_failure_report(group, &error.to_string());
        if let Err(e) = self.notifier.deliver(admin, &report).await {
            tracing::error!("Failed to report delivery failure to admin: {}", e);
        }
    }
}

fn enter(from: CyclePhase, to: CyclePhase) -> CyclePhase {
    match from.transition_to(to) {
        Ok(next) => {
            tracing::debug!(from = from.as_str(), to = to.as_str(), "Cycle phase");
            next
        }
        Err(e) => {
            tracing::error!("Unexpected cycle phase change: {}", e);
            to
        }
    }
}
