//! RotationState - the persisted record of roster position and payment status.
//!
//! The settled pointer is the only authoritative field. The current obligor
//! is derived from it whenever a state is rebuilt from storage, and stored
//! values that disagree are discarded.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::Roster;

/// Raw value of `last_payer_index` on a fresh install.
pub const NEVER_SETTLED: i64 = -1;

/// Record layout written by this crate.
///
/// Version 0 (field absent) is the layout of the earlier bot, where
/// `last_payer_index` names the participant most recently announced rather
/// than the one before the current obligor.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// On-disk shape of the rotation state.
///
/// Field names match the files written by existing deployments; those files
/// carry no `format_version` and are converted when read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default)]
    pub format_version: u32,

    #[serde(default = "never_settled")]
    pub last_payer_index: i64,

    #[serde(default)]
    pub current_payer_index: i64,

    #[serde(default)]
    pub current_payer_name: String,

    #[serde(default)]
    pub current_cycle_paid: bool,
}

fn never_settled() -> i64 {
    NEVER_SETTLED
}

impl StateRecord {
    /// True for files written by the earlier bot.
    pub fn is_legacy(&self) -> bool {
        self.format_version < STATE_FORMAT_VERSION
    }
}

/// In-memory rotation state.
///
/// # Invariants
///
/// - `last_settled` is `None` (never settled) or a valid roster index
/// - `current_index` is a valid roster index and `current_name` is the name at it
/// - when rebuilt from storage, `current_index` is the successor of `last_settled`
///   (index 0 when never settled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    last_settled: Option<usize>,
    current_index: usize,
    current_name: String,
    current_cycle_paid: bool,
}

impl RotationState {
    /// Default state of a fresh install: nobody settled, first participant up, unpaid.
    pub fn initial(roster: &Roster) -> Self {
        Self::assemble(roster, None, 0, false)
    }

    /// Builds a state from the settled pointer, deriving the current obligor.
    pub fn settled(
        roster: &Roster,
        last_settled: Option<usize>,
        current_cycle_paid: bool,
    ) -> Result<Self, ValidationError> {
        if let Some(last) = last_settled {
            check_index("last_payer_index", last as i64, roster)?;
        }
        let current = derived_index(last_settled, roster.len());
        Ok(Self::assemble(roster, last_settled, current, current_cycle_paid))
    }

    /// Rebuilds a state from its stored record.
    ///
    /// Only `last_payer_index` and `current_cycle_paid` are read; the stored
    /// current index and name are recomputed. In a legacy record the pointer
    /// names the last announced participant, who becomes the current obligor.
    pub fn from_record(roster: &Roster, record: &StateRecord) -> Result<Self, ValidationError> {
        let last_settled = match record.last_payer_index {
            NEVER_SETTLED => None,
            raw => {
                let index = check_index("last_payer_index", raw, roster)?;
                if record.is_legacy() {
                    Some((index + roster.len() - 1) % roster.len())
                } else {
                    Some(index)
                }
            }
        };
        Self::settled(roster, last_settled, record.current_cycle_paid)
    }

    pub fn to_record(&self) -> StateRecord {
        StateRecord {
            format_version: STATE_FORMAT_VERSION,
            last_payer_index: self.last_settled_index(),
            current_payer_index: self.current_index as i64,
            current_payer_name: self.current_name.clone(),
            current_cycle_paid: self.current_cycle_paid,
        }
    }

    /// Checks the structural invariants against `roster`.
    pub fn validate(&self, roster: &Roster) -> Result<(), ValidationError> {
        if let Some(last) = self.last_settled {
            check_index("last_payer_index", last as i64, roster)?;
        }
        check_index("current_payer_index", self.current_index as i64, roster)?;
        match roster.get(self.current_index) {
            Some(name) if name == self.current_name => Ok(()),
            _ => Err(ValidationError::invalid_format(
                "current_payer_name",
                format!(
                    "'{}' is not the participant at index {}",
                    self.current_name, self.current_index
                ),
            )),
        }
    }

    /// True when the current obligor is the one the settled pointer implies,
    /// i.e. no unconfirmed announcement is pending.
    pub fn is_settled(&self, roster: &Roster) -> bool {
        self.current_index == derived_index(self.last_settled, roster.len())
    }

    pub fn last_settled(&self) -> Option<usize> {
        self.last_settled
    }

    /// Settled pointer in its stored form, `-1` when never settled.
    pub fn last_settled_index(&self) -> i64 {
        self.last_settled.map_or(NEVER_SETTLED, |i| i as i64)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_name(&self) -> &str {
        &self.current_name
    }

    pub fn current_cycle_paid(&self) -> bool {
        self.current_cycle_paid
    }

    pub(super) fn assemble(
        roster: &Roster,
        last_settled: Option<usize>,
        current_index: usize,
        current_cycle_paid: bool,
    ) -> Self {
        let current_index = current_index % roster.len();
        Self {
            last_settled,
            current_index,
            current_name: roster.name_at(current_index).to_string(),
            current_cycle_paid,
        }
    }

    pub(super) fn with_paid(mut self, paid: bool) -> Self {
        self.current_cycle_paid = paid;
        self
    }
}

/// Index implied by the settled pointer.
pub(super) fn derived_index(last_settled: Option<usize>, len: usize) -> usize {
    last_settled.map_or(0, |last| (last + 1) % len)
}

fn check_index(field: &str, raw: i64, roster: &Roster) -> Result<usize, ValidationError> {
    let max = roster.len() as i64 - 1;
    if raw < 0 || raw > max {
        return Err(ValidationError::out_of_range(field, 0, max, raw));
    }
    Ok(raw as usize)
}
