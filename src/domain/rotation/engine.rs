//! RotationEngine - pure rotation arithmetic over a roster and a state snapshot.
//!
//! Nothing here performs I/O or mutates its input. The one place the settled
//! pointer moves forward is [`RotationEngine::settle`], which the scheduler
//! calls only after the reminder was delivered; [`RotationEngine::override_to`]
//! moves it on operator authority.

use chrono::NaiveDate;

use super::calendar::DueMonth;
use super::state::derived_index;
use super::{Roster, RotationError, RotationState};

/// The participant responsible for the current cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obligor {
    pub index: usize,
    pub name: String,
}

/// When a participant's next cycle falls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDate {
    /// Roster spelling of the name.
    pub name: String,
    /// Rotation steps from the current cycle; 0 means the participant is up now.
    pub steps: usize,
    pub month: DueMonth,
}

/// Stateless rotation rules bound to a roster.
#[derive(Debug, Clone, Copy)]
pub struct RotationEngine<'a> {
    roster: &'a Roster,
}

impl<'a> RotationEngine<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    pub fn current_obligor(&self, state: &RotationState) -> Obligor {
        Obligor {
            index: state.current_index(),
            name: state.current_name().to_string(),
        }
    }

    /// Index the next cycle should be assigned to.
    ///
    /// Computed from the settled pointer alone, so repeated attempts after a
    /// failed delivery land on the same participant. A roster that has never
    /// been settled starts at its first participant.
    pub fn candidate_index(&self, state: &RotationState) -> usize {
        let len = self.roster.len();
        match state.last_settled() {
            None => 0,
            Some(_) => (derived_index(state.last_settled(), len) + 1) % len,
        }
    }

    /// Moves the current cycle to the candidate and clears the paid flag.
    ///
    /// The settled pointer is left untouched.
    pub fn advance(&self, state: &RotationState) -> RotationState {
        RotationState::assemble(
            self.roster,
            state.last_settled(),
            self.candidate_index(state),
            false,
        )
    }

    /// Commits the current cycle: the pointer moves to the participant just
    /// before the current obligor, so the state reloads to the same obligor.
    pub fn settle(&self, state: &RotationState) -> RotationState {
        let len = self.roster.len();
        let last = (state.current_index() + len - 1) % len;
        RotationState::assemble(
            self.roster,
            Some(last),
            state.current_index(),
            state.current_cycle_paid(),
        )
    }

    /// Rotation steps from the current obligor to `name`.
    pub fn months_until(&self, state: &RotationState, name: &str) -> Result<usize, RotationError> {
        let target = self.index_of(name)?;
        let len = self.roster.len();
        Ok((target + len - state.current_index() % len) % len)
    }

    /// Calendar month of the next cycle owed by `name`, counted from `today`.
    pub fn due_date(
        &self,
        state: &RotationState,
        name: &str,
        today: NaiveDate,
    ) -> Result<DueDate, RotationError> {
        let index = self.index_of(name)?;
        let steps = self.months_until(state, name)?;
        Ok(DueDate {
            name: self.roster.name_at(index).to_string(),
            steps,
            month: DueMonth::containing(today).plus_months(steps),
        })
    }

    /// Makes `name` the current obligor, unpaid, with the pointer set so the
    /// next advance continues after them.
    pub fn override_to(
        &self,
        _state: &RotationState,
        name: &str,
    ) -> Result<RotationState, RotationError> {
        let target = self.index_of(name)?;
        let len = self.roster.len();
        Ok(RotationState::assemble(
            self.roster,
            Some((target + len - 1) % len),
            target,
            false,
        ))
    }

    /// Confirms payment for the current cycle.
    pub fn mark_paid(&self, state: &RotationState) -> Result<RotationState, RotationError> {
        if state.current_cycle_paid() {
            return Err(RotationError::already_paid(state.current_name()));
        }
        Ok(state.clone().with_paid(true))
    }

    fn index_of(&self, name: &str) -> Result<usize, RotationError> {
        self.roster
            .position_of(name)
            .ok_or_else(|| RotationError::not_found(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn abc() -> Roster {
        Roster::new(["A", "B", "C"]).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn current_obligor_reads_state() {
        let roster = abc();
        let state = RotationState::settled(&roster, Some(1), false).unwrap();
        let obligor = RotationEngine::new(&roster).current_obligor(&state);
        assert_eq!(obligor, Obligor { index: 2, name: "C".to_string() });
    }

    #[test]
    fn first_advance_on_fresh_roster_picks_first_participant() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let next = engine.advance(&RotationState::initial(&roster));
        assert_eq!(next.current_name(), "A");
        assert_eq!(next.last_settled_index(), -1);
    }

    #[test]
    fn advance_moves_to_successor_and_clears_paid() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let state = RotationState::settled(&roster, Some(0), true).unwrap();
        let next = engine.advance(&state);
        assert_eq!(next.current_name(), "C");
        assert!(!next.current_cycle_paid());
        assert_eq!(next.last_settled(), Some(0));
    }

    #[test]
    fn advance_wraps_around() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let state = RotationState::settled(&roster, Some(1), false).unwrap();
        assert_eq!(engine.advance(&state).current_name(), "A");
    }

    #[test]
    fn advance_twice_on_same_state_gives_same_candidate() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let state = RotationState::settled(&roster, Some(2), false).unwrap();
        assert_eq!(engine.advance(&state), engine.advance(&state));
    }

    #[test]
    fn settle_keeps_obligor_and_satisfies_reload() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let state = RotationState::settled(&roster, Some(0), false).unwrap();
        let settled = engine.settle(&engine.advance(&state));

        assert_eq!(settled.current_name(), "C");
        assert_eq!(settled.last_settled(), Some(1));
        let reloaded = RotationState::from_record(&roster, &settled.to_record()).unwrap();
        assert_eq!(reloaded, settled);
    }

    #[test]
    fn settle_after_first_advance_wraps_pointer() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let settled = engine.settle(&engine.advance(&RotationState::initial(&roster)));
        assert_eq!(settled.current_name(), "A");
        assert_eq!(settled.last_settled(), Some(2));
        assert_eq!(engine.advance(&settled).current_name(), "B");
    }

    #[test]
    fn months_until_current_is_zero() {
        let roster = abc();
        let state = RotationState::initial(&roster);
        let engine = RotationEngine::new(&roster);
        assert_eq!(engine.months_until(&state, state.current_name()), Ok(0));
    }

    #[test]
    fn months_until_counts_forward_steps() {
        let roster = abc();
        let state = RotationState::initial(&roster);
        let engine = RotationEngine::new(&roster);
        assert_eq!(engine.months_until(&state, "C"), Ok(2));
        assert_eq!(engine.months_until(&state, "B"), Ok(1));
    }

    #[test]
    fn months_until_wraps_behind_current() {
        let roster = abc();
        let state = RotationState::settled(&roster, Some(1), false).unwrap();
        let engine = RotationEngine::new(&roster);
        assert_eq!(engine.months_until(&state, "b"), Ok(2));
    }

    #[test]
    fn months_until_unknown_name_is_not_found() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let result = engine.months_until(&RotationState::initial(&roster), "Z");
        assert_eq!(result, Err(RotationError::not_found("Z")));
    }

    #[test]
    fn due_date_projects_calendar_month() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let due = engine
            .due_date(&RotationState::initial(&roster), "c", date(2026, 11, 19))
            .unwrap();
        assert_eq!(due.name, "C");
        assert_eq!(due.steps, 2);
        assert_eq!(due.month.first_day(), Some(date(2027, 1, 1)));
    }

    #[test]
    fn override_sets_obligor_and_pointer() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let paid = RotationState::initial(&roster).with_paid(true);
        let state = engine.override_to(&paid, "B").unwrap();

        assert_eq!(state.current_index(), 1);
        assert!(!state.current_cycle_paid());
        assert_eq!(state.last_settled_index(), 0);
        assert_eq!(engine.advance(&state).current_name(), "C");
    }

    #[test]
    fn override_to_first_participant_wraps_pointer() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let state = engine.override_to(&RotationState::initial(&roster), "a").unwrap();
        assert_eq!(state.last_settled_index(), 2);
        assert_eq!(state.current_name(), "A");
    }

    #[test]
    fn override_unknown_name_leaves_state_alone() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let state = RotationState::initial(&roster);
        assert!(matches!(
            engine.override_to(&state, "Zed"),
            Err(RotationError::NotFound(_))
        ));
    }

    #[test]
    fn mark_paid_twice_reports_already_paid() {
        let roster = abc();
        let engine = RotationEngine::new(&roster);
        let paid = engine.mark_paid(&RotationState::initial(&roster)).unwrap();
        assert!(paid.current_cycle_paid());

        let again = engine.mark_paid(&paid);
        assert_eq!(again, Err(RotationError::already_paid("A")));
        assert!(paid.current_cycle_paid());
        assert_eq!(paid.current_index(), 0);
    }

    proptest! {
        #[test]
        fn reload_always_derives_current_from_pointer(
            len in 1usize..8,
            last in -1i64..8,
            stored_index in -3i64..12,
            paid in any::<bool>(),
        ) {
            let names: Vec<String> = (0..len).map(|i| format!("P{}", i)).collect();
            let roster = Roster::new(&names).unwrap();
            let record = super::super::StateRecord {
                format_version: super::super::STATE_FORMAT_VERSION,
                last_payer_index: last,
                current_payer_index: stored_index,
                current_payer_name: "whoever".to_string(),
                current_cycle_paid: paid,
            };
            match RotationState::from_record(&roster, &record) {
                Ok(state) => {
                    let expected = ((last + 1) as usize) % len;
                    prop_assert_eq!(state.current_index(), expected);
                    prop_assert_eq!(state.current_name(), names[expected].as_str());
                    prop_assert!(state.validate(&roster).is_ok());
                }
                Err(_) => prop_assert!(last >= len as i64),
            }
        }

        #[test]
        fn months_until_is_within_roster(len in 1usize..8, last in 0usize..8, target in 0usize..8) {
            let names: Vec<String> = (0..len).map(|i| format!("P{}", i)).collect();
            let roster = Roster::new(&names).unwrap();
            let state = RotationState::settled(&roster, Some(last % len), false).unwrap();
            let engine = RotationEngine::new(&roster);
            let steps = engine.months_until(&state, &names[target % len]).unwrap();
            prop_assert!(steps < len);
            prop_assert_eq!((state.current_index() + steps) % len, target % len);
        }

        #[test]
        fn settled_advance_reloads_identically(len in 1usize..8, last in 0usize..8) {
            let names: Vec<String> = (0..len).map(|i| format!("P{}", i)).collect();
            let roster = Roster::new(&names).unwrap();
            let engine = RotationEngine::new(&roster);
            let state = RotationState::settled(&roster, Some(last % len), false).unwrap();
            let committed = engine.settle(&engine.advance(&state));
            let reloaded = RotationState::from_record(&roster, &committed.to_record()).unwrap();
            prop_assert_eq!(reloaded, committed);
        }
    }
}
