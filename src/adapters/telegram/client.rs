//! Telegram Bot API client.
//!
//! Covers the two calls the bot needs: `sendMessage` with HTML parse mode
//! and long-polling `getUpdates`.
//!
//! ```ignore
//! let config = TelegramClientConfig::new(token)
//!     .with_base_url("https://api.telegram.org")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let client = TelegramClient::new(config)?;
//! ```

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::ChatId;
use crate::ports::DeliveryError;

/// Configuration for the Telegram client.
#[derive(Debug, Clone)]
pub struct TelegramClientConfig {
    bot_token: Secret<String>,
    /// Base URL for the API (default: https://api.telegram.org).
    pub base_url: String,
    /// Timeout for ordinary requests.
    pub timeout: Duration,
}

impl TelegramClientConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: Secret::new(bot_token.into()),
            base_url: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn bot_token(&self) -> &str {
        self.bot_token.expose_secret()
    }
}

/// Thin wrapper over the Bot API.
pub struct TelegramClient {
    config: TelegramClientConfig,
    client: Client,
}

impl TelegramClient {
    pub fn new(config: TelegramClientConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.base_url,
            self.config.bot_token(),
            method
        )
    }

    /// Sends `text` to `chat` with HTML formatting.
    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError> {
        let body = SendMessageRequest {
            chat_id: chat.as_i64(),
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let _: ApiMessage = Self::parse_response(response).await?;
        Ok(())
    }

    /// Long-polls for updates newer than `offset`.
    ///
    /// The request timeout is stretched past `poll_timeout` so the server
    /// closes the poll before the client gives up.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout: Duration,
    ) -> Result<Vec<Update>, DeliveryError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(self.config.timeout + poll_timeout)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::parse_response(response).await
    }

    /// Unwraps the `{ok, result}` envelope, mapping refusals to `Rejected`.
    async fn parse_response<T: for<'de> Deserialize<'de>>(
        response: Response,
    ) -> Result<T, DeliveryError> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(DeliveryError::rejected(status.as_u16(), body));
            }
            Err(e) => {
                return Err(DeliveryError::transport(format!(
                    "Failed to parse response: {}",
                    e
                )))
            }
        };

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(DeliveryError::rejected(
                error_code.unwrap_or(status.as_u16()),
                description.unwrap_or_else(|| "no description".to_string()),
            )),
        }
    }
}

/// Strips the request URL, which carries the bot token.
fn transport_error(e: reqwest::Error) -> DeliveryError {
    let e = e.without_url();
    if e.is_timeout() {
        DeliveryError::transport(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        DeliveryError::transport(format!("Connection failed: {}", e))
    } else {
        DeliveryError::transport(e.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Bot API types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<u16>,
    description: Option<String>,
}

/// One entry from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<ApiMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message_id: i64,
    pub from: Option<ApiUser>,
    pub chat: ApiChat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiChat {
    pub id: i64,
    /// "private", "group", "supergroup" or "channel".
    #[serde(rename = "type")]
    pub kind: String,
}
