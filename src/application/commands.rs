//! CommandSurface - turns chat commands into handler calls and reply text.
//!
//! Operator commands (`/paid`, `/resend`, `/override`, `/start`, `/help`)
//! only run in a private chat with the configured admin. Public commands
//! (`/list`, `/status`, `/commands`, `/<name>`) run anywhere.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

use crate::application::handlers::rotation::{
    GetDueDateHandler, GetDueDateQuery, GetStatusHandler, GetStatusQuery, ListRosterHandler,
    MarkPaidCommand, MarkPaidHandler, OverrideCycleCommand, OverrideCycleHandler,
    ResendReminderCommand, ResendReminderHandler,
};
use crate::application::messages::{self, escape_html};
use crate::domain::foundation::{ChatId, ErrorCode, UserId};
use crate::domain::rotation::{Roster, RotationError};

/// Kind of chat a command arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// A command message as received from the transport.
#[derive(Debug, Clone)]
pub struct IncomingCommand {
    /// Absent for anonymous senders (channel posts, anonymous admins).
    pub sender: Option<UserId>,
    pub chat: ChatId,
    pub chat_kind: ChatKind,
    pub text: String,
}

/// Recognized commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Paid,
    Resend,
    Override(Option<String>),
    List,
    Status,
    Commands,
    /// `/<name>` for a roster participant.
    DueDate(String),
}

impl Command {
    /// Parses `/word[@bot] [args]`. Returns `None` for anything unrecognized.
    pub fn parse(text: &str, roster: &Roster) -> Option<Command> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let word = head.split('@').next().unwrap_or_default().to_lowercase();

        let command = match word.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "paid" => Command::Paid,
            "resend" => Command::Resend,
            "override" => Command::Override(Some(args.to_string()).filter(|a| !a.is_empty())),
            "list" => Command::List,
            "status" => Command::Status,
            "commands" => Command::Commands,
            name => {
                let index = roster.position_of(name)?;
                Command::DueDate(roster.get(index)?.to_string())
            }
        };
        Some(command)
    }

    pub fn requires_operator(&self) -> bool {
        matches!(
            self,
            Command::Start | Command::Help | Command::Paid | Command::Resend | Command::Override(_)
        )
    }
}

pub struct CommandSurface {
    roster: Arc<Roster>,
    admin: Option<UserId>,
    offset: FixedOffset,
    mark_paid: MarkPaidHandler,
    override_cycle: OverrideCycleHandler,
    resend_reminder: ResendReminderHandler,
    get_status: GetStatusHandler,
    get_due_date: GetDueDateHandler,
    list_roster: ListRosterHandler,
}

/// Handlers the surface dispatches to.
pub struct CommandHandlers {
    pub mark_paid: MarkPaidHandler,
    pub override_cycle: OverrideCycleHandler,
    pub resend_reminder: ResendReminderHandler,
    pub get_status: GetStatusHandler,
    pub get_due_date: GetDueDateHandler,
    pub list_roster: ListRosterHandler,
}

impl CommandSurface {
    pub fn new(
        roster: Arc<Roster>,
        admin: Option<UserId>,
        offset: FixedOffset,
        handlers: CommandHandlers,
    ) -> Self {
        Self {
            roster,
            admin,
            offset,
            mark_paid: handlers.mark_paid,
            override_cycle: handlers.override_cycle,
            resend_reminder: handlers.resend_reminder,
            get_status: handlers.get_status,
            get_due_date: handlers.get_due_date,
            list_roster: handlers.list_roster,
        }
    }

    /// Handle `incoming` at the current time; returns the reply, if any.
    pub async fn dispatch(&self, incoming: IncomingCommand) -> Option<String> {
        let now = Utc::now().with_timezone(&self.offset);
        self.dispatch_at(incoming, now).await
    }

    pub async fn dispatch_at(
        &self,
        incoming: IncomingCommand,
        now: DateTime<FixedOffset>,
    ) -> Option<String> {
        let Some(command) = Command::parse(&incoming.text, &self.roster) else {
            tracing::debug!(chat = %incoming.chat, text = %incoming.text, "Ignoring unrecognized command");
            return None;
        };

        if command.requires_operator() {
            if incoming.chat_kind != ChatKind::Private {
                tracing::debug!(chat = %incoming.chat, ?command, "Operator command outside private chat ignored");
                return None;
            }
            let is_admin = self.admin.is_some() && incoming.sender == self.admin;
            if !is_admin {
                tracing::warn!(
                    code = %ErrorCode::Forbidden,
                    sender = ?incoming.sender.map(|s| s.as_i64()),
                    ?command,
                    "Unauthorized operator command"
                );
                return Some("⛔ Only the admin can use this command.".to_string());
            }
        }

        let operator = incoming.sender.unwrap_or(UserId::new(0));
        let reply = match command {
            Command::Start | Command::Help => operator_help(),
            Command::Paid => self.paid(operator).await,
            Command::Resend => self.resend(now).await,
            Command::Override(None) => "Usage: /override &lt;name&gt;".to_string(),
            Command::Override(Some(name)) => self.override_to(operator, name).await,
            Command::List => messages::roster_list(&self.list_roster.handle()),
            Command::Status => self.status(now).await,
            Command::Commands => public_help(),
            Command::DueDate(name) => self.due_date(name, now).await,
        };
        Some(reply)
    }

    async fn paid(&self, operator: UserId) -> String {
        match self.mark_paid.handle(MarkPaidCommand { operator }).await {
            Ok(result) => {
                let mut reply = format!(
                    "✅ Payment from <b>{}</b> recorded.",
                    escape_html(&result.obligor.name)
                );
                if let Err(e) = &result.announcement {
                    reply.push_str(&format!(
                        "\n⚠️ The group announcement could not be sent: {}",
                        escape_html(&e.to_string())
                    ));
                }
                if !result.persisted {
                    reply.push_str("\n⚠️ The state file could not be written.");
                }
                reply
            }
            Err(RotationError::AlreadyPaid { name }) => format!(
                "ℹ️ <b>{}</b> has already paid this cycle.",
                escape_html(&name)
            ),
            Err(e) => format!("❌ {}", escape_html(&e.to_string())),
        }
    }

    async fn resend(&self, now: DateTime<FixedOffset>) -> String {
        match self
            .resend_reminder
            .handle(ResendReminderCommand { now })
            .await
        {
            Ok(result) if result.committed => format!(
                "📨 Reminder for <b>{}</b> sent to the group. The pending cycle is now confirmed.",
                escape_html(&result.obligor.name)
            ),
            Ok(result) => format!(
                "📨 Reminder for <b>{}</b> sent to the group.",
                escape_html(&result.obligor.name)
            ),
            Err(e) => format!(
                "❌ Could not send the reminder: {}",
                escape_html(&e.to_string())
            ),
        }
    }

    async fn override_to(&self, operator: UserId, name: String) -> String {
        match self
            .override_cycle
            .handle(OverrideCycleCommand { operator, name })
            .await
        {
            Ok(result) => {
                let mut reply = format!(
                    "🔁 Current payer set to <b>{}</b> (was {}). Next month continues from here.",
                    escape_html(&result.current.name),
                    escape_html(&result.previous.name)
                );
                if !result.persisted {
                    reply.push_str("\n⚠️ The state file could not be written.");
                }
                reply
            }
            Err(RotationError::NotFound(name)) => format!(
                "❌ '{}' is not on the roster. Use /list to see the names.",
                escape_html(&name)
            ),
            Err(e) => format!("❌ {}", escape_html(&e.to_string())),
        }
    }

    async fn status(&self, now: DateTime<FixedOffset>) -> String {
        let view = self
            .get_status
            .handle(GetStatusQuery {
                today: now.date_naive(),
            })
            .await;
        let mut reply = messages::status(&view.obligor, view.position, view.paid, view.month);
        if !view.settled {
            reply.push_str("\n\n⚠️ This month's reminder has not been delivered yet.");
        }
        reply
    }

    async fn due_date(&self, name: String, now: DateTime<FixedOffset>) -> String {
        let query = GetDueDateQuery {
            name,
            today: now.date_naive(),
        };
        match self.get_due_date.handle(query).await {
            Ok(due) => messages::due_date(&due),
            Err(e) => format!("❌ {}", escape_html(&e.to_string())),
        }
    }
}

fn operator_help() -> String {
    [
        "🤖 Admin commands (private chat only):",
        "",
        "/paid - confirm this month's payment",
        "/resend - send the reminder to the group again",
        "/override &lt;name&gt; - set the current payer",
        "",
        "Everyone can use /list, /status, /commands and /&lt;name&gt;.",
    ]
    .join("\n")
}

fn public_help() -> String {
    [
        "📋 Available commands:",
        "",
        "/list - payment order",
        "/status - who pays this month",
        "/&lt;name&gt; - when that person pays next",
    ]
    .join("\n")
}
