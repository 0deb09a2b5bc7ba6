//! User-facing message text.
//!
//! Everything here is sent with HTML parse mode, so interpolated values go
//! through [`escape_html`].

use crate::domain::rotation::{DueDate, DueMonth, RosterEntry};

/// Static parts of the monthly reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTemplate {
    /// What is being paid for, e.g. "Spotify".
    pub service_name: String,
    /// Display amount including currency, e.g. "R$ 34,90".
    pub amount: String,
    /// Where the money goes.
    pub payment_key: String,
    /// Who confirms payments, e.g. "@treasurer".
    pub admin_handle: String,
}

impl ReminderTemplate {
    /// The reminder announcing `obligor` for `month`.
    pub fn reminder(&self, obligor: &str, month: DueMonth) -> String {
        format!(
            "🚨 <b>{service} payment reminder - {month}/{year}</b> 🚨\n\n\
             👤 This month it is your turn to pay: <b>{obligor}</b>\n\n\
             (Send {amount} to {key} and ask {admin} to confirm in private!)",
            service = escape_html(&self.service_name),
            month = month.month_name(),
            year = month.year(),
            obligor = escape_html(obligor),
            amount = escape_html(&self.amount),
            key = escape_html(&self.payment_key),
            admin = escape_html(&self.admin_handle),
        )
    }
}

/// Escapes `&`, `<` and `>`; quotes are left as they are.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn payment_confirmed_announcement(obligor: &str) -> String {
    format!(
        "🎉 Payment from <b>{}</b> confirmed by the admin!\n\nThank you!",
        escape_html(obligor)
    )
}

pub fn delivery_failure_report(group: impl std::fmt::Display, cause: &str) -> String {
    format!(
        "⚠️ Failed to send the reminder to group {}. Error: {}",
        group,
        escape_html(cause)
    )
}

pub fn roster_list(entries: &[RosterEntry]) -> String {
    let mut message = String::from("📅 Payment order:\n");
    for entry in entries {
        message.push_str(&format!("\n{}. {}", entry.position, escape_html(&entry.name)));
    }
    message
}

pub fn status(obligor: &str, position: usize, paid: bool, month: DueMonth) -> String {
    let status = if paid { "✅ Paid" } else { "⏳ Pending" };
    format!(
        "📊 Current payment status ({}/{}):\n\n👤 Turn of: <b>{}</b> (position {})\n\n💰 Status: {}",
        month.month_name(),
        month.year(),
        escape_html(obligor),
        position,
        status
    )
}

pub fn due_date(due: &DueDate) -> String {
    let horizon = match due.steps {
        0 => "(this month!)".to_string(),
        1 => "(in 1 month)".to_string(),
        n => format!("(in {} months)", n),
    };
    format!(
        "🗓️ The next payment from <b>{}</b> is due on the 1st of <b>{} {}</b>\n{}",
        escape_html(&due.name),
        due.month.month_name(),
        due.month.year(),
        horizon
    )
}
