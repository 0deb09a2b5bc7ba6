//! Application configuration module
//!
//! Configuration is read from environment variables with the `PAYROTA`
//! prefix; nested values are separated by double underscores. A `.env` file
//! is loaded first when present.
//!
//! # Example
//!
//! ```no_run
//! use payrota::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Reminders fire on day {}", config.schedule.day_of_month);
//! ```

mod error;
mod logging;
mod rotation;
mod schedule;
mod telegram;

pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use rotation::RotationConfig;
pub use schedule::ScheduleConfig;
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bot API access and chat identities
    pub telegram: TelegramConfig,

    /// Roster, state file and reminder text
    #[serde(default)]
    pub rotation: RotationConfig,

    /// Monthly trigger time
    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `PAYROTA__TELEGRAM__BOT_TOKEN=123:abc` -> `telegram.bot_token`
    /// - `PAYROTA__ROTATION__ROSTER=Ana,Bruno` -> `rotation.roster`
    /// - `PAYROTA__SCHEDULE__HOUR=9` -> `schedule.hour`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the bot token is missing or a value cannot
    /// be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYROTA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telegram.validate()?;
        self.rotation.validate()?;
        self.schedule.validate()?;
        Ok(())
    }

    /// Settings that are allowed but limit what the bot can do.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.telegram.group_id.is_none() {
            warnings.push("telegram.group_id is not set; reminders cannot be delivered");
        }
        if self.telegram.admin_user_id.is_none() {
            warnings.push("telegram.admin_user_id is not set; operator commands are disabled");
        }
        warnings
    }
}
