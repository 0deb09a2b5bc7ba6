//! GetStatusHandler - query for the current cycle.

use chrono::NaiveDate;

use super::SharedRotation;
use crate::domain::rotation::DueMonth;

#[derive(Debug, Clone)]
pub struct GetStatusQuery {
    pub today: NaiveDate,
}

/// Snapshot of the current cycle for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub obligor: String,
    /// 1-based roster position.
    pub position: usize,
    pub paid: bool,
    pub month: DueMonth,
    /// False while a failed announcement is waiting for the next trigger.
    pub settled: bool,
}

pub struct GetStatusHandler {
    rotation: SharedRotation,
}

impl GetStatusHandler {
    pub fn new(rotation: SharedRotation) -> Self {
        Self { rotation }
    }

    pub async fn handle(&self, query: GetStatusQuery) -> StatusView {
        let state = self.rotation.snapshot().await;
        StatusView {
            obligor: state.current_name().to_string(),
            position: state.current_index() + 1,
            paid: state.current_cycle_paid(),
            month: DueMonth::containing(query.today),
            settled: state.is_settled(self.rotation.roster()),
        }
    }
}
