use std::fmt;
use std::str::FromStr;

use crate::candidate::{Candidate, CandidateId};
use crate::enforcer::{control_for, enforce, AdvanceControl};
use crate::protocol::RosterResponse;

pub const SEMI_FINAL_LIMIT: usize = 10;
pub const GRAND_FINAL_LIMIT: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundKind {
    SemiFinal(u8),
    GrandFinal,
}

impl RoundKind {
    /// Index 0 is the grand-final sentinel used by the page markup.
    pub fn from_index(index: u8) -> Self {
        if index == 0 {
            RoundKind::GrandFinal
        } else {
            RoundKind::SemiFinal(index)
        }
    }

    pub fn index(self) -> u8 {
        match self {
            RoundKind::SemiFinal(index) => index,
            RoundKind::GrandFinal => 0,
        }
    }

    pub fn is_grand_final(self) -> bool {
        matches!(self, RoundKind::GrandFinal)
    }

    pub fn policy(self) -> RoundPolicy {
        RoundPolicy::for_kind(self)
    }
}

impl fmt::Display for RoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundKind::SemiFinal(index) => write!(f, "semi-final-{index}"),
            RoundKind::GrandFinal => f.write_str("grand-final"),
        }
    }
}

impl FromStr for RoundKind {
    type Err = RoundKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value.trim().to_ascii_lowercase();
        match raw.as_str() {
            "final" | "grand" | "grand-final" | "grand_final" | "gf" => {
                return Ok(RoundKind::GrandFinal)
            }
            _ => {}
        }
        let digits = ["semi-final-", "semi-final", "semi-", "semi", "sf"]
            .iter()
            .find_map(|prefix| raw.strip_prefix(prefix))
            .unwrap_or(raw.as_str());
        digits
            .parse::<u8>()
            .map(RoundKind::from_index)
            .map_err(|_| RoundKindError::Unrecognised(value.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundKindError {
    #[error("unrecognised round {0:?} (expected semi-N or final)")]
    Unrecognised(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet {
    pub active: &'static str,
    pub inactive: &'static str,
}

impl LabelSet {
    pub const SEMI_FINAL: LabelSet = LabelSet {
        active: "FINAL",
        inactive: "Pass to final",
    };
    pub const GRAND_FINAL: LabelSet = LabelSet {
        active: "WINNER",
        inactive: "Select winner",
    };
    pub const OFFICIAL: LabelSet = LabelSet {
        active: "Remove",
        inactive: "Add",
    };

    pub fn label(&self, active: bool) -> &'static str {
        if active {
            self.active
        } else {
            self.inactive
        }
    }
}

/// Selection rules shared by the enforcer and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPolicy {
    pub limit: usize,
    pub is_grand_final: bool,
    pub labels: LabelSet,
}

impl RoundPolicy {
    pub const SEMI_FINAL: RoundPolicy = RoundPolicy {
        limit: SEMI_FINAL_LIMIT,
        is_grand_final: false,
        labels: LabelSet::SEMI_FINAL,
    };
    pub const GRAND_FINAL: RoundPolicy = RoundPolicy {
        limit: GRAND_FINAL_LIMIT,
        is_grand_final: true,
        labels: LabelSet::GRAND_FINAL,
    };

    pub fn for_kind(kind: RoundKind) -> Self {
        match kind {
            RoundKind::SemiFinal(_) => Self::SEMI_FINAL,
            RoundKind::GrandFinal => Self::GRAND_FINAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub kind: RoundKind,
    pub policy: RoundPolicy,
    pub is_admin: bool,
    pub candidates: Vec<Candidate>,
    pub generation: u64,
}

impl Round {
    pub fn from_roster(kind: RoundKind, roster: RosterResponse, generation: u64) -> Self {
        let candidates = roster
            .artists
            .into_iter()
            .enumerate()
            .map(|(index, artist)| Candidate {
                id: artist.id,
                display_order: artist.order.unwrap_or(index as i64 + 1),
                name: artist.name,
                score: artist.score,
                advanced: artist.advanced,
                is_official: artist.official,
            })
            .collect();
        Self {
            kind,
            policy: kind.policy(),
            is_admin: roster.admin,
            candidates,
            generation,
        }
    }

    pub fn position(&self, id: CandidateId) -> Option<usize> {
        self.candidates.iter().position(|candidate| candidate.id == id)
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|candidate| candidate.advanced)
            .count()
    }

    pub fn controls(&self) -> Vec<AdvanceControl> {
        enforce(&self.candidates, self.policy.limit)
    }

    pub fn control(&self, index: usize) -> Option<AdvanceControl> {
        let candidate = self.candidates.get(index)?;
        Some(control_for(
            candidate.advanced,
            self.active_count(),
            self.policy.limit,
        ))
    }
}
