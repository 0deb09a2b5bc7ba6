//! Phases of a single cycle-advance attempt.

use crate::domain::foundation::StateMachine;

/// `Idle → Advancing → Notifying → {Committed | NotifyFailed} → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CyclePhase {
    /// Waiting for the next monthly trigger.
    Idle,
    /// Candidate obligor computed, paid flag reset.
    Advancing,
    /// Reminder delivery in flight.
    Notifying,
    /// Delivery confirmed; settled pointer moved forward.
    Committed,
    /// Delivery failed; pointer left in place for the next trigger.
    NotifyFailed,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Advancing => "advancing",
            CyclePhase::Notifying => "notifying",
            CyclePhase::Committed => "committed",
            CyclePhase::NotifyFailed => "notify_failed",
        }
    }

    /// True for the two outcomes an attempt can end in.
    pub fn is_outcome(&self) -> bool {
        matches!(self, CyclePhase::Committed | CyclePhase::NotifyFailed)
    }
}

impl StateMachine for CyclePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CyclePhase::*;
        matches!(
            (self, target),
            (Idle, Advancing)
                | (Advancing, Notifying)
                | (Notifying, Committed)
                | (Notifying, NotifyFailed)
                | (Committed, Idle)
                | (NotifyFailed, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CyclePhase::*;
        match self {
            Idle => vec![Advancing],
            Advancing => vec![Notifying],
            Notifying => vec![Committed, NotifyFailed],
            Committed | NotifyFailed => vec![Idle],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CyclePhase; 5] = [
        CyclePhase::Idle,
        CyclePhase::Advancing,
        CyclePhase::Notifying,
        CyclePhase::Committed,
        CyclePhase::NotifyFailed,
    ];

    #[test]
    fn happy_path_is_valid() {
        let phase = CyclePhase::Idle
            .transition_to(CyclePhase::Advancing)
            .and_then(|p| p.transition_to(CyclePhase::Notifying))
            .and_then(|p| p.transition_to(CyclePhase::Committed))
            .and_then(|p| p.transition_to(CyclePhase::Idle));
        assert_eq!(phase, Ok(CyclePhase::Idle));
    }

    #[test]
    fn cannot_commit_without_notifying() {
        assert!(CyclePhase::Advancing
            .transition_to(CyclePhase::Committed)
            .is_err());
    }

    #[test]
    fn cannot_skip_advancing() {
        assert!(CyclePhase::Idle.transition_to(CyclePhase::Notifying).is_err());
    }

    #[test]
    fn no_phase_is_terminal() {
        for phase in ALL {
            assert!(!phase.is_terminal(), "{:?} should return to Idle", phase);
        }
    }

    #[test]
    fn outcomes_return_to_idle() {
        for phase in ALL.iter().filter(|p| p.is_outcome()) {
            assert_eq!(phase.valid_transitions(), vec![CyclePhase::Idle]);
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for phase in ALL {
            for target in ALL {
                assert_eq!(
                    phase.can_transition_to(&target),
                    phase.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    phase,
                    target
                );
            }
        }
    }
}
