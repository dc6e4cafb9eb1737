//! JSON bodies exchanged with the voting API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateId, Score};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default, rename = "final")]
    pub advanced: bool,
    #[serde(default)]
    pub official: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterResponse {
    #[serde(default)]
    pub admin: bool,
    pub artists: Vec<ArtistRecord>,
}

/// Score write. A cleared score is sent as an explicit `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreVote {
    pub artist_id: CandidateId,
    pub score: Option<Score>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalVote {
    pub artist_id: CandidateId,
    #[serde(rename = "final")]
    pub advanced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VotePayload {
    Score(ScoreVote),
    Final(FinalVote),
}

impl VotePayload {
    pub fn artist_id(&self) -> CandidateId {
        match self {
            VotePayload::Score(vote) => vote.artist_id,
            VotePayload::Final(vote) => vote.artist_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(DirectionError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("direction must be \"up\" or \"down\", got {0:?}")]
pub struct DirectionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultsKind {
    SemiFinals,
    GrandFinal,
}

/// One aggregated line of the public results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub order: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub final_votes: u32,
    #[serde(default)]
    pub voters: Vec<String>,
}

impl ResultRow {
    pub fn average_label(&self) -> String {
        match self.avg {
            Some(avg) => avg.to_string(),
            None => "—".to_string(),
        }
    }

    pub fn voters_label(&self) -> String {
        self.voters.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Roster(RosterResponse),
    Ack,
    Results(Vec<ResultRow>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}
