//! Interaction dispatcher for one voting round.
//!
//! The controller owns the [`Round`] and never performs I/O. Every user
//! intent mutates the round optimistically and returns the [`Command`]s a
//! runtime must send; runtimes report each outcome back through
//! [`Controller::complete`], which may in turn produce follow-up commands
//! (roster reloads after admin actions). Any number of commands may be in
//! flight at once.

use std::collections::BTreeMap;
use std::fmt;
use std::mem;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::candidate::{CandidateId, Score};
use crate::endpoint::Request;
use crate::enforcer::AdvanceControl;
use crate::protocol::{ApiError, ApiResponse, Direction, FinalVote, ScoreVote, VotePayload};
use crate::round::{Round, RoundKind, RoundPolicy};
use crate::view::{project, RowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: RequestId,
    pub request: Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Load,
    SetScore {
        id: CandidateId,
        score: Option<Score>,
    },
    ToggleAdvance {
        id: CandidateId,
    },
    ToggleOfficial {
        id: CandidateId,
    },
    Move {
        id: CandidateId,
        direction: Direction,
    },
}

/// What happens to optimistic state when its write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep the local value; it stays diverged until the next reload.
    #[default]
    Keep,
    /// Restore the value the row held before the write.
    Revert,
}

impl FromStr for FailurePolicy {
    type Err = FailurePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(FailurePolicy::Keep),
            "revert" => Ok(FailurePolicy::Revert),
            other => Err(FailurePolicyError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failure policy must be \"keep\" or \"revert\", got {0:?}")]
pub struct FailurePolicyError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("roster for {0} has not been loaded")]
    NotLoaded(RoundKind),
    #[error("candidate {0} is not part of this round")]
    UnknownCandidate(CandidateId),
    #[error("selection limit of {limit} reached; candidate {id} cannot be selected")]
    SelectionBlocked { id: CandidateId, limit: usize },
    #[error("admin rights required")]
    AdminOnly,
    #[error("candidate {0} cannot be reordered")]
    NotReorderable(CandidateId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Score {
        previous: Option<Score>,
        sent: Option<Score>,
    },
    Advance {
        previous: bool,
        sent: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Roster,
    Write {
        generation: u64,
        candidate: CandidateId,
        field: Field,
    },
    Admin,
}

pub struct Controller {
    kind: RoundKind,
    policy: RoundPolicy,
    failure_policy: FailurePolicy,
    round: Option<Round>,
    generation: u64,
    next_request: u64,
    latest_fetch: Option<RequestId>,
    pending: BTreeMap<RequestId, Pending>,
}

impl Controller {
    pub fn new(kind: RoundKind) -> Self {
        Self {
            kind,
            policy: kind.policy(),
            failure_policy: FailurePolicy::default(),
            round: None,
            generation: 0,
            next_request: 0,
            latest_fetch: None,
            pending: BTreeMap::new(),
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn kind(&self) -> RoundKind {
        self.kind
    }

    pub fn policy(&self) -> RoundPolicy {
        self.policy
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.round.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.round.as_ref().is_some_and(|round| round.is_admin)
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.round.as_ref().map(project).unwrap_or_default()
    }

    pub fn controls(&self) -> Vec<AdvanceControl> {
        self.round
            .as_ref()
            .map(Round::controls)
            .unwrap_or_default()
    }

    pub fn handle(&mut self, intent: Intent) -> Result<Vec<Command>, DispatchError> {
        debug!(round = %self.kind, ?intent, "dispatch");
        match intent {
            Intent::Load => Ok(vec![self.fetch()]),
            Intent::SetScore { id, score } => self.set_score(id, score),
            Intent::ToggleAdvance { id } => self.toggle_advance(id),
            Intent::ToggleOfficial { id } => self.toggle_official(id),
            Intent::Move { id, direction } => self.reorder(id, direction),
        }
    }

    /// Feeds the outcome of an issued command back into the session.
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Vec<Command> {
        let Some(pending) = self.pending.remove(&id) else {
            warn!(request = %id, "completion for unknown request");
            return Vec::new();
        };
        match pending {
            Pending::Roster => {
                self.finish_fetch(id, outcome);
                Vec::new()
            }
            Pending::Write {
                generation,
                candidate,
                field,
            } => {
                if let Err(err) = outcome {
                    warn!(request = %id, %candidate, %err, "vote write failed");
                    self.write_failed(generation, candidate, field);
                }
                Vec::new()
            }
            Pending::Admin => {
                if let Err(err) = &outcome {
                    warn!(request = %id, %err, "admin write failed");
                }
                vec![self.fetch()]
            }
        }
    }

    fn issue(&mut self, request: Request, pending: Pending) -> Command {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        if let Request::SubmitVote { vote, .. } = &request {
            debug!(request = %id, artist = %vote.artist_id(), "vote write issued");
        }
        self.pending.insert(id, pending);
        Command { id, request }
    }

    fn fetch(&mut self) -> Command {
        let command = self.issue(Request::FetchRoster(self.kind), Pending::Roster);
        self.latest_fetch = Some(command.id);
        command
    }

    fn finish_fetch(&mut self, id: RequestId, outcome: Result<ApiResponse, ApiError>) {
        if self.latest_fetch != Some(id) {
            debug!(request = %id, "ignoring superseded roster response");
            return;
        }
        match outcome {
            Ok(ApiResponse::Roster(roster)) => {
                self.generation += 1;
                debug!(
                    round = %self.kind,
                    generation = self.generation,
                    artists = roster.artists.len(),
                    "roster replaced"
                );
                self.round = Some(Round::from_roster(self.kind, roster, self.generation));
            }
            Ok(other) => {
                warn!(request = %id, ?other, "unexpected response to roster fetch");
            }
            Err(err) => {
                warn!(round = %self.kind, %err, "roster load failed");
            }
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut Round, DispatchError> {
        let kind = self.kind;
        self.round.as_mut().ok_or(DispatchError::NotLoaded(kind))
    }

    fn loaded(&self) -> Result<&Round, DispatchError> {
        self.round
            .as_ref()
            .ok_or(DispatchError::NotLoaded(self.kind))
    }

    fn set_score(
        &mut self,
        id: CandidateId,
        score: Option<Score>,
    ) -> Result<Vec<Command>, DispatchError> {
        let round = self.loaded_mut()?;
        let index = round
            .position(id)
            .ok_or(DispatchError::UnknownCandidate(id))?;
        let previous = mem::replace(&mut round.candidates[index].score, score);
        let generation = round.generation;
        let request = Request::SubmitVote {
            round: self.kind,
            vote: VotePayload::Score(ScoreVote {
                artist_id: id,
                score,
            }),
        };
        let pending = Pending::Write {
            generation,
            candidate: id,
            field: Field::Score {
                previous,
                sent: score,
            },
        };
        Ok(vec![self.issue(request, pending)])
    }

    fn toggle_advance(&mut self, id: CandidateId) -> Result<Vec<Command>, DispatchError> {
        let policy = self.policy;
        let kind = self.kind;
        let round = self.loaded_mut()?;
        let index = round
            .position(id)
            .ok_or(DispatchError::UnknownCandidate(id))?;
        let control = round
            .control(index)
            .ok_or(DispatchError::UnknownCandidate(id))?;

        // The grand final replaces its single winner instead of refusing.
        if control.is_disabled() && !policy.is_grand_final {
            debug!(%id, limit = policy.limit, "selection blocked");
            return Err(DispatchError::SelectionBlocked {
                id,
                limit: policy.limit,
            });
        }

        let selecting = !control.is_active();
        let mut writes = Vec::new();
        if policy.is_grand_final && selecting {
            for other in round
                .candidates
                .iter_mut()
                .filter(|candidate| candidate.advanced && candidate.id != id)
            {
                other.advanced = false;
                writes.push((other.id, true, false));
            }
        }
        round.candidates[index].advanced = selecting;
        writes.push((id, !selecting, selecting));
        let generation = round.generation;

        Ok(writes
            .into_iter()
            .map(|(candidate, previous, sent)| {
                let request = Request::SubmitVote {
                    round: kind,
                    vote: VotePayload::Final(FinalVote {
                        artist_id: candidate,
                        advanced: sent,
                    }),
                };
                let pending = Pending::Write {
                    generation,
                    candidate,
                    field: Field::Advance { previous, sent },
                };
                self.issue(request, pending)
            })
            .collect())
    }

    fn toggle_official(&mut self, id: CandidateId) -> Result<Vec<Command>, DispatchError> {
        let round = self.loaded()?;
        if !round.is_admin {
            return Err(DispatchError::AdminOnly);
        }
        if round.candidate(id).is_none() {
            return Err(DispatchError::UnknownCandidate(id));
        }
        Ok(vec![self.issue(Request::ToggleOfficial(id), Pending::Admin)])
    }

    fn reorder(
        &mut self,
        id: CandidateId,
        direction: Direction,
    ) -> Result<Vec<Command>, DispatchError> {
        let round = self.loaded()?;
        if !round.is_admin {
            return Err(DispatchError::AdminOnly);
        }
        let candidate = round
            .candidate(id)
            .ok_or(DispatchError::UnknownCandidate(id))?;
        if !round.policy.is_grand_final || !candidate.is_official {
            return Err(DispatchError::NotReorderable(id));
        }
        Ok(vec![self.issue(
            Request::Reorder { id, direction },
            Pending::Admin,
        )])
    }

    fn write_failed(&mut self, generation: u64, candidate: CandidateId, field: Field) {
        if self.failure_policy == FailurePolicy::Keep {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.generation != generation {
            debug!(%candidate, "roster replaced since write; nothing to revert");
            return;
        }
        let Some(index) = round.position(candidate) else {
            return;
        };
        match field {
            Field::Score { previous, sent } => {
                let row = &mut round.candidates[index];
                if row.score == sent {
                    row.score = previous;
                    debug!(%candidate, "score reverted");
                }
            }
            Field::Advance { previous, sent } => {
                if round.candidates[index].advanced != sent {
                    return;
                }
                if previous && round.active_count() >= round.policy.limit {
                    debug!(%candidate, "revert skipped; selection limit reached");
                    return;
                }
                round.candidates[index].advanced = previous;
                debug!(%candidate, advanced = previous, "selection reverted");
            }
        }
    }
}
