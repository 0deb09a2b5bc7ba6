//! Monthly trigger configuration

use chrono::FixedOffset;
use serde::Deserialize;

use super::error::ValidationError;

/// When the monthly reminder fires
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Day of month (1-28)
    #[serde(default = "default_day_of_month")]
    pub day_of_month: u32,

    #[serde(default = "default_hour")]
    pub hour: u32,

    #[serde(default)]
    pub minute: u32,

    /// Offset from UTC in minutes (default: -180, America/Fortaleza)
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl ScheduleConfig {
    /// `None` when the offset is out of range; validation rejects that case.
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
    }

    /// Validate schedule configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=28).contains(&self.day_of_month) {
            return Err(ValidationError::InvalidScheduleDay(self.day_of_month));
        }
        if self.hour > 23 || self.minute > 59 {
            return Err(ValidationError::InvalidScheduleTime(self.hour, self.minute));
        }
        if !(-720..=840).contains(&self.utc_offset_minutes) {
            return Err(ValidationError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_of_month: default_day_of_month(),
            hour: default_hour(),
            minute: 0,
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

fn default_day_of_month() -> u32 {
    1
}

fn default_hour() -> u32 {
    9
}

fn default_utc_offset_minutes() -> i32 {
    -180
}
