//! ListRosterHandler - the fixed payment order.

use std::sync::Arc;

use crate::domain::rotation::{Roster, RosterEntry};

pub struct ListRosterHandler {
    roster: Arc<Roster>,
}

impl ListRosterHandler {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self { roster }
    }

    pub fn handle(&self) -> Vec<RosterEntry> {
        self.roster.entries()
    }
}
