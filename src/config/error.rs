//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid Telegram bot token format")]
    InvalidBotToken,

    #[error("Telegram API base URL must start with http:// or https://")]
    InvalidApiBaseUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Long-poll timeout must be at most 50 seconds")]
    InvalidPollTimeout,

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Day of month must be between 1 and 28, got {0}")]
    InvalidScheduleDay(u32),

    #[error("Invalid schedule time {0:02}:{1:02}")]
    InvalidScheduleTime(u32, u32),

    #[error("UTC offset must be between -720 and 840 minutes, got {0}")]
    InvalidUtcOffset(i32),
}
