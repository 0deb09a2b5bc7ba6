//! MonthlyScheduler - fires the cycle trigger once a month.
//!
//! Times are computed against a fixed UTC offset. Fire times are recomputed
//! from the wall clock after every trigger, so a late wake-up never causes a
//! double fire within one month.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::rotation::{AdvanceCycleCommand, AdvanceCycleHandler};
use crate::domain::foundation::ValidationError;
use crate::domain::rotation::DueMonth;

/// Day and time of the monthly trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySchedule {
    day: u32,
    hour: u32,
    minute: u32,
    offset: FixedOffset,
}

impl MonthlySchedule {
    /// `day` is capped at 28 so every month has it.
    pub fn new(
        day: u32,
        hour: u32,
        minute: u32,
        offset: FixedOffset,
    ) -> Result<Self, ValidationError> {
        if !(1..=28).contains(&day) {
            return Err(ValidationError::out_of_range("day_of_month", 1, 28, day as i64));
        }
        if hour > 23 {
            return Err(ValidationError::out_of_range("hour", 0, 23, hour as i64));
        }
        if minute > 59 {
            return Err(ValidationError::out_of_range("minute", 0, 59, minute as i64));
        }
        Ok(Self {
            day,
            hour,
            minute,
            offset,
        })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// First fire time strictly after `now`.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        let local = now.with_timezone(&self.offset);
        let this_month = DueMonth::containing(local.date_naive());
        [this_month, this_month.plus_months(1)]
            .into_iter()
            .filter_map(|month| self.fire_time_in(month))
            .find(|fire| *fire > local)
    }

    fn fire_time_in(&self, month: DueMonth) -> Option<DateTime<FixedOffset>> {
        let naive = NaiveDate::from_ymd_opt(month.year(), month.month(), self.day)?
            .and_hms_opt(self.hour, self.minute, 0)?;
        self.offset.from_local_datetime(&naive).single()
    }
}

/// Background task driving [`AdvanceCycleHandler`].
pub struct MonthlyScheduler {
    schedule: MonthlySchedule,
    handler: Arc<AdvanceCycleHandler>,
}

impl MonthlyScheduler {
    pub fn new(schedule: MonthlySchedule, handler: Arc<AdvanceCycleHandler>) -> Self {
        Self { schedule, handler }
    }

    /// Sleep until each fire time and trigger, until `shutdown` flips to true
    /// or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let now = Utc::now();
            let Some(next) = self.schedule.next_fire_after(now) else {
                tracing::error!(%now, "No representable fire time, scheduler stopping");
                return;
            };
            let wait = (next.with_timezone(&Utc) - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            tracing::info!(next = %next, "Next cycle trigger scheduled");

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Scheduler stopped");
                        return;
                    }
                }

                _ = time::sleep(wait) => {
                    self.fire(next).await;
                }
            }
        }
    }

    /// Run one trigger as if fired at `at`.
    pub async fn fire(&self, at: DateTime<FixedOffset>) {
        tracing::info!(fired_at = %at, "Monthly trigger fired");
        let result = self
            .handler
            .handle(AdvanceCycleCommand { fired_at: at })
            .await;
        tracing::info!(
            obligor = %result.obligor.name,
            outcome = result.outcome.as_str(),
            persisted = result.persisted,
            "Monthly trigger finished"
        );
    }
}
