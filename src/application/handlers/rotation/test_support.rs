//! Shared fixtures for handler tests.

use chrono::{DateTime, FixedOffset, TimeZone};
use std::sync::Arc;

use super::{DeliveryTargets, SharedRotation};
use crate::adapters::notifier::MockNotifier;
use crate::adapters::storage::InMemoryStateStore;
use crate::application::messages::ReminderTemplate;
use crate::domain::foundation::ChatId;
use crate::domain::rotation::{Roster, RotationState};

pub const GROUP: ChatId = ChatId::new(-1001);
pub const ADMIN: ChatId = ChatId::new(77);

pub fn roster() -> Arc<Roster> {
    Arc::new(Roster::new(["Ana", "Bruno", "Caio"]).unwrap())
}

pub fn targets() -> DeliveryTargets {
    DeliveryTargets {
        group: Some(GROUP),
        admin: Some(ADMIN),
    }
}

pub fn template() -> Arc<ReminderTemplate> {
    Arc::new(ReminderTemplate {
        service_name: "Spotify".to_string(),
        amount: "R$ 34,90".to_string(),
        payment_key: "pay@example.com".to_string(),
        admin_handle: "@treasurer".to_string(),
    })
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(y, m, d, 9, 0, 0)
        .unwrap()
}

pub struct Fixture {
    pub rotation: SharedRotation,
    pub store: Arc<InMemoryStateStore>,
    pub notifier: Arc<MockNotifier>,
}

/// Rotation seeded with `state`, backed by an in-memory store.
pub async fn fixture(state: RotationState) -> Fixture {
    let roster = roster();
    let store = Arc::new(InMemoryStateStore::with_record(
        roster.clone(),
        state.to_record(),
    ));
    let rotation = SharedRotation::load(roster, store.clone()).await;
    Fixture {
        rotation,
        store,
        notifier: Arc::new(MockNotifier::new()),
    }
}
