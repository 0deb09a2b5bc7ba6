//! Rotation and reminder configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::rotation::Roster;

/// Rotation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RotationConfig {
    /// Participants in payment order (comma-separated)
    #[serde(default = "default_roster")]
    pub roster: String,

    /// Where the rotation state is kept
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Shared service being paid for
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Display amount, currency included
    #[serde(default = "default_amount")]
    pub amount: String,

    /// Where payments are sent
    #[serde(default)]
    pub payment_key: String,

    /// Handle shown in reminders as the person confirming payments
    #[serde(default)]
    pub admin_handle: String,
}

impl RotationConfig {
    /// Parse the configured roster
    pub fn roster(&self) -> Result<Roster, ValidationError> {
        Roster::from_csv(&self.roster).map_err(|e| ValidationError::InvalidRoster(e.to_string()))
    }

    /// Validate rotation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.roster()?;
        if self.state_file.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("ROTATION__STATE_FILE"));
        }
        if self.service_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ROTATION__SERVICE_NAME"));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            state_file: default_state_file(),
            service_name: default_service_name(),
            amount: default_amount(),
            payment_key: String::new(),
            admin_handle: String::new(),
        }
    }
}

fn default_roster() -> String {
    "Lucas,Thiago,Victor,Alice,Aline,Matheus".to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from("/data/bot_state.json")
}

fn default_service_name() -> String {
    "Spotify".to_string()
}

fn default_amount() -> String {
    "R$ 34,90".to_string()
}
