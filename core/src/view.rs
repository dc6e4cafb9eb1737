//! Row projection of a [`Round`] for rendering.

use crate::candidate::{CandidateId, Score};
use crate::round::{LabelSet, Round};

pub const UNSET_SCORE_LABEL: &str = "–";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceView {
    pub label: &'static str,
    pub active: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficialView {
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: CandidateId,
    pub ordinal: i64,
    pub name: String,
    pub score: Option<Score>,
    pub advance: AdvanceView,
    pub official: Option<OfficialView>,
    pub reorderable: bool,
}

pub fn project(round: &Round) -> Vec<RowView> {
    let controls = round.controls();
    let grand_final = round.policy.is_grand_final;
    round
        .candidates
        .iter()
        .zip(controls)
        .enumerate()
        .map(|(index, (candidate, control))| {
            let ordinal = if grand_final {
                index as i64 + 1
            } else {
                candidate.display_order
            };
            let official = round.is_admin.then(|| OfficialView {
                label: LabelSet::OFFICIAL.label(candidate.is_official),
                active: candidate.is_official,
            });
            RowView {
                id: candidate.id,
                ordinal,
                name: candidate.name.clone(),
                score: candidate.score,
                advance: AdvanceView {
                    label: round.policy.labels.label(control.is_active()),
                    active: control.is_active(),
                    disabled: control.is_disabled(),
                },
                official,
                reorderable: round.is_admin && grand_final && candidate.is_official,
            }
        })
        .collect()
}

/// Label shown in the score selector for a value or the unset sentinel.
pub fn score_label(score: Option<Score>) -> String {
    match score {
        Some(score) => score.to_string(),
        None => UNSET_SCORE_LABEL.to_string(),
    }
}
