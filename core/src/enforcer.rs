//! Selection-limit enforcement.
//!
//! Disabled state is a pure function of which rows are active and the
//! round's limit. Active controls are never disabled so a selection can
//! always be undone, even at the limit.

use crate::candidate::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceControl {
    Active,
    Available,
    Blocked,
}

impl AdvanceControl {
    pub fn is_active(self) -> bool {
        matches!(self, AdvanceControl::Active)
    }

    pub fn is_disabled(self) -> bool {
        matches!(self, AdvanceControl::Blocked)
    }
}

pub fn enforce(candidates: &[Candidate], limit: usize) -> Vec<AdvanceControl> {
    let active = candidates
        .iter()
        .filter(|candidate| candidate.advanced)
        .count();
    candidates
        .iter()
        .map(|candidate| control_for(candidate.advanced, active, limit))
        .collect()
}

pub(crate) fn control_for(advanced: bool, active_count: usize, limit: usize) -> AdvanceControl {
    if advanced {
        AdvanceControl::Active
    } else if active_count >= limit {
        AdvanceControl::Blocked
    } else {
        AdvanceControl::Available
    }
}
