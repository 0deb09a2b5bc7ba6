//! OverrideCycleHandler - operator sets the current obligor by name.
//!
//! Rewinds or skips the rotation; the next trigger continues after the
//! chosen participant.

use super::SharedRotation;
use crate::domain::foundation::UserId;
use crate::domain::rotation::{Obligor, RotationEngine, RotationError};

#[derive(Debug, Clone)]
pub struct OverrideCycleCommand {
    pub operator: UserId,
    /// Roster name, matched case-insensitively.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct OverrideCycleResult {
    pub previous: Obligor,
    pub current: Obligor,
    pub persisted: bool,
}

pub struct OverrideCycleHandler {
    rotation: SharedRotation,
}

impl OverrideCycleHandler {
    pub fn new(rotation: SharedRotation) -> Self {
        Self { rotation }
    }

    pub async fn handle(
        &self,
        cmd: OverrideCycleCommand,
    ) -> Result<OverrideCycleResult, RotationError> {
        let mut current = self.rotation.lock().await;
        let engine = RotationEngine::new(self.rotation.roster());

        let next = engine.override_to(&current, &cmd.name)?;
        let previous = engine.current_obligor(&current);
        let persisted = self.rotation.persist(&next).await.is_ok();
        let obligor = engine.current_obligor(&next);
        *current = next;

        tracing::warn!(
            operator = %cmd.operator,
            from = %previous.name,
            to = %obligor.name,
            "Rotation overridden"
        );

        Ok(OverrideCycleResult {
            previous,
            current: obligor,
            persisted,
        })
    }
}
