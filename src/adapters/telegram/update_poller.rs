//! UpdatePoller - long-polls the Bot API and feeds commands to the
//! [`CommandSurface`].
//!
//! Replies go back to the chat the command came from. Transport errors are
//! logged and retried after a fixed delay; the offset only advances past
//! updates that were fetched.
//!
//! Shutdown interrupts a pending long poll but never a batch being handled.
//! Before stopping, the offset of the last handled batch is sent once more so
//! Telegram does not deliver those updates again on the next start.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use super::client::{ApiMessage, TelegramClient, Update};
use crate::application::commands::{ChatKind, CommandSurface, IncomingCommand};
use crate::domain::foundation::{ChatId, UserId};
use crate::ports::DeliveryError;

#[derive(Debug, Clone)]
pub struct UpdatePollerConfig {
    /// Long-poll duration passed to `getUpdates`.
    pub poll_timeout: Duration,
    /// Pause after a failed poll.
    pub retry_delay: Duration,
}

impl Default for UpdatePollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(25),
            retry_delay: Duration::from_secs(5),
        }
    }
}

pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    surface: Arc<CommandSurface>,
    config: UpdatePollerConfig,
}

impl UpdatePoller {
    pub fn new(
        client: Arc<TelegramClient>,
        surface: Arc<CommandSurface>,
        config: UpdatePollerConfig,
    ) -> Self {
        Self {
            client,
            surface,
            config,
        }
    }

    /// Poll until `shutdown` flips to true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut offset = None;

        loop {
            let fetched = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.acknowledge(offset).await;
                        tracing::info!("Update poller stopped");
                        return;
                    }
                    continue;
                }

                fetched = self.client.get_updates(offset, self.config.poll_timeout) => fetched,
            };

            match fetched {
                Ok(updates) => offset = self.handle_batch(offset, updates).await,
                Err(e) => {
                    tracing::warn!(
                        retry_in_secs = self.config.retry_delay.as_secs(),
                        "Polling for updates failed: {}",
                        e
                    );
                    time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    /// Fetch and handle one batch; returns the offset for the next poll.
    pub async fn poll_once(&self, offset: Option<i64>) -> Result<Option<i64>, DeliveryError> {
        let updates = self
            .client
            .get_updates(offset, self.config.poll_timeout)
            .await?;
        Ok(self.handle_batch(offset, updates).await)
    }

    async fn handle_batch(&self, offset: Option<i64>, updates: Vec<Update>) -> Option<i64> {
        let mut next = offset;
        for update in updates {
            next = Some(update.update_id + 1);
            self.handle_update(update).await;
        }
        next
    }

    /// Confirms handled updates with a zero-timeout poll. Updates returned by
    /// it are left unconfirmed.
    async fn acknowledge(&self, offset: Option<i64>) {
        let Some(offset) = offset else {
            return;
        };
        if let Err(e) = self.client.get_updates(Some(offset), Duration::ZERO).await {
            tracing::warn!(offset, "Failed to confirm handled updates: {}", e);
        }
    }

    async fn handle_update(&self, update: Update) {
        let Some(incoming) = update.message.as_ref().and_then(to_incoming) else {
            return;
        };
        let chat = incoming.chat;

        let Some(reply) = self.surface.dispatch(incoming).await else {
            return;
        };
        if let Err(e) = self.client.send_message(chat, &reply).await {
            tracing::warn!(chat = %chat, "Failed to send command reply: {}", e);
        }
    }
}

/// Only text messages starting with `/` are commands.
fn to_incoming(message: &ApiMessage) -> Option<IncomingCommand> {
    let text = message.text.as_deref()?.trim();
    if !text.starts_with('/') {
        return None;
    }
    let chat_kind = if message.chat.kind == "private" {
        ChatKind::Private
    } else {
        ChatKind::Group
    };
    Some(IncomingCommand {
        sender: message.from.as_ref().map(|u| UserId::new(u.id)),
        chat: ChatId::new(message.chat.id),
        chat_kind,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::telegram::TelegramClientConfig;
    use crate::application::commands::CommandHandlers;
    use crate::application::handlers::rotation::test_support::*;
    use crate::application::handlers::rotation::{
        GetDueDateHandler, GetStatusHandler, ListRosterHandler, MarkPaidHandler,
        OverrideCycleHandler, ResendReminderHandler,
    };
    use crate::domain::rotation::RotationState;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message(chat_kind: &str, text: Option<&str>) -> ApiMessage {
        serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "from": {"id": 77},
            "chat": {"id": 77, "type": chat_kind},
            "text": text
        }))
        .unwrap()
    }

    async fn poller_for(server: &MockServer) -> (UpdatePoller, Fixture) {
        let fixture = fixture(RotationState::initial(&roster())).await;
        let rotation = fixture.rotation.clone();
        let surface = CommandSurface::new(
            roster(),
            Some(UserId::new(77)),
            *at(2026, 1, 1).offset(),
            CommandHandlers {
                mark_paid: MarkPaidHandler::new(rotation.clone(), fixture.notifier.clone(), targets()),
                override_cycle: OverrideCycleHandler::new(rotation.clone()),
                resend_reminder: ResendReminderHandler::new(
                    rotation.clone(),
                    fixture.notifier.clone(),
                    targets(),
                    template(),
                ),
                get_status: GetStatusHandler::new(rotation.clone()),
                get_due_date: GetDueDateHandler::new(rotation),
                list_roster: ListRosterHandler::new(roster()),
            },
        );
        let client = TelegramClient::new(
            TelegramClientConfig::new("1:t")
                .with_base_url(server.uri())
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap();
        let config = UpdatePollerConfig {
            poll_timeout: Duration::from_secs(0),
            retry_delay: Duration::from_millis(10),
        };
        (
            UpdatePoller::new(Arc::new(client), Arc::new(surface), config),
            fixture,
        )
    }

    #[test]
    fn private_command_maps_to_incoming() {
        let incoming = to_incoming(&message("private", Some(" /paid "))).unwrap();
        assert_eq!(incoming.chat_kind, ChatKind::Private);
        assert_eq!(incoming.sender, Some(UserId::new(77)));
        assert_eq!(incoming.text, "/paid");
    }

    #[test]
    fn supergroup_is_a_group() {
        let incoming = to_incoming(&message("supergroup", Some("/list"))).unwrap();
        assert_eq!(incoming.chat_kind, ChatKind::Group);
    }

    #[test]
    fn plain_text_and_media_are_skipped() {
        assert!(to_incoming(&message("group", Some("hello"))).is_none());
        assert!(to_incoming(&message("group", None)).is_none());
    }

    #[tokio::test]
    async fn poll_once_replies_and_advances_offset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{
                    "update_id": 500,
                    "message": {
                        "message_id": 3,
                        "from": {"id": 9},
                        "chat": {"id": -1001, "type": "group"},
                        "text": "/list@payrota_bot"
                    }
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/sendMessage"))
            .and(body_partial_json(serde_json::json!({"chat_id": -1001})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"message_id": 4, "chat": {"id": -1001, "type": "group"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (poller, _fixture) = poller_for(&server).await;
        let next = poller.poll_once(None).await.unwrap();

        assert_eq!(next, Some(501));
    }

    #[tokio::test]
    async fn empty_batch_keeps_offset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/getUpdates"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": []})),
            )
            .mount(&server)
            .await;

        let (poller, _fixture) = poller_for(&server).await;

        assert_eq!(poller.poll_once(Some(42)).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn operator_command_updates_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{
                    "update_id": 7,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 77},
                        "chat": {"id": 77, "type": "private"},
                        "text": "/paid"
                    }
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"message_id": 2, "chat": {"id": 77, "type": "private"}}
            })))
            .mount(&server)
            .await;

        let (poller, fixture) = poller_for(&server).await;
        poller.poll_once(None).await.unwrap();

        assert!(fixture.rotation.snapshot().await.current_cycle_paid());
    }

    #[tokio::test]
    async fn shutdown_during_batch_finishes_it_and_confirms_offset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{
                    "update_id": 41,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 9},
                        "chat": {"id": -1001, "type": "group"},
                        "text": "/list"
                    }
                }]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/getUpdates"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": []}))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot1:t/sendMessage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "ok": true,
                        "result": {"message_id": 2, "chat": {"id": -1001, "type": "group"}}
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (poller, _fixture) = poller_for(&server).await;
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(async move { poller.run(rx).await });

        // The reply to /list is still in flight
        time::sleep(Duration::from_millis(200)).await;
        tx.send(true).unwrap();
        time::timeout(Duration::from_secs(5), task)
            .await
            .expect("poller did not stop")
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let last_poll: serde_json::Value = requests
            .iter()
            .rev()
            .find(|r| r.url.path().ends_with("/getUpdates"))
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .unwrap();
        assert_eq!(last_poll["offset"], 42);
        assert_eq!(last_poll["timeout"], 0);
    }
}
