//! GetDueDateHandler - when is a participant's next cycle.

use chrono::NaiveDate;

use super::SharedRotation;
use crate::domain::rotation::{DueDate, RotationEngine, RotationError};

#[derive(Debug, Clone)]
pub struct GetDueDateQuery {
    pub name: String,
    pub today: NaiveDate,
}

pub struct GetDueDateHandler {
    rotation: SharedRotation,
}

impl GetDueDateHandler {
    pub fn new(rotation: SharedRotation) -> Self {
        Self { rotation }
    }

    pub async fn handle(&self, query: GetDueDateQuery) -> Result<DueDate, RotationError> {
        let state = self.rotation.snapshot().await;
        RotationEngine::new(self.rotation.roster()).due_date(&state, &query.name, query.today)
    }
}
