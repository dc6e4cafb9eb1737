pub mod candidate;
pub mod codec;
pub mod controller;
pub mod endpoint;
pub mod enforcer;
pub mod protocol;
pub mod round;
pub mod view;

pub use candidate::{Candidate, CandidateId, Score, ScoreError, MAX_SCORE};
pub use codec::{decode_response, encode};
pub use controller::{
    Command, Controller, DispatchError, FailurePolicy, FailurePolicyError, Intent, RequestId,
};
pub use endpoint::{bearer, join_url, ApiRequest, Method, Request, ResponseKind};
pub use enforcer::{enforce, AdvanceControl};
pub use protocol::{
    ApiError, ApiResponse, ArtistRecord, Direction, DirectionError, FinalVote, OrderPayload,
    ResultRow, ResultsKind, RosterResponse, ScoreVote, VotePayload,
};
pub use round::{
    LabelSet, Round, RoundKind, RoundKindError, RoundPolicy, GRAND_FINAL_LIMIT, SEMI_FINAL_LIMIT,
};
pub use view::{project, score_label, AdvanceView, OfficialView, RowView, UNSET_SCORE_LABEL};
