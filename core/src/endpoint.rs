use crate::candidate::CandidateId;
use crate::codec::encode;
use crate::protocol::{Direction, OrderPayload, ResultsKind, VotePayload};
use crate::round::RoundKind;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Roster,
    Ack,
    Results,
}

/// Everything the session can ask of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchRoster(RoundKind),
    SubmitVote { round: RoundKind, vote: VotePayload },
    ToggleOfficial(CandidateId),
    Reorder { id: CandidateId, direction: Direction },
    FetchResults(ResultsKind),
}

/// Transport-neutral HTTP description of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
    pub expects: ResponseKind,
}

impl Request {
    pub fn to_api(&self) -> ApiRequest {
        match self {
            Request::FetchRoster(RoundKind::SemiFinal(index)) => {
                ApiRequest::get(format!("/api/semi-finals/{index}"), ResponseKind::Roster)
            }
            Request::FetchRoster(RoundKind::GrandFinal) => {
                ApiRequest::get("/api/grand-final".to_string(), ResponseKind::Roster)
            }
            Request::SubmitVote { round, vote } => {
                let path = if round.is_grand_final() {
                    "/api/grand-vote"
                } else {
                    "/api/vote"
                };
                ApiRequest {
                    method: Method::Post,
                    path: path.to_string(),
                    body: encode(vote),
                    expects: ResponseKind::Ack,
                }
            }
            Request::ToggleOfficial(id) => ApiRequest {
                method: Method::Post,
                path: format!("/api/admin/final/{id}"),
                body: None,
                expects: ResponseKind::Ack,
            },
            Request::Reorder { id, direction } => ApiRequest {
                method: Method::Put,
                path: format!("/api/admin/final/order/{id}"),
                body: encode(&OrderPayload {
                    direction: *direction,
                }),
                expects: ResponseKind::Ack,
            },
            Request::FetchResults(ResultsKind::SemiFinals) => {
                ApiRequest::get("/api/results".to_string(), ResponseKind::Results)
            }
            Request::FetchResults(ResultsKind::GrandFinal) => {
                ApiRequest::get("/api/results-final".to_string(), ResponseKind::Results)
            }
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Request::FetchRoster(_) | Request::FetchResults(_)
        )
    }
}

impl ApiRequest {
    fn get(path: String, expects: ResponseKind) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
            expects,
        }
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token.trim())
}

pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    format!("{base}{path}")
}
