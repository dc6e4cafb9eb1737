use serde::Serialize;

use crate::endpoint::ResponseKind;
use crate::protocol::{ApiError, ApiResponse, ResultRow, RosterResponse};

pub fn encode<T>(value: &T) -> Option<String>
where
    T: Serialize,
{
    serde_json::to_string(value).ok()
}

/// Interprets a successful response body. Acks ignore the body entirely.
pub fn decode_response(kind: ResponseKind, bytes: &[u8]) -> Result<ApiResponse, ApiError> {
    match kind {
        ResponseKind::Ack => Ok(ApiResponse::Ack),
        ResponseKind::Roster => serde_json::from_slice::<RosterResponse>(bytes)
            .map(ApiResponse::Roster)
            .map_err(|err| ApiError::Decode(err.to_string())),
        ResponseKind::Results => serde_json::from_slice::<Vec<ResultRow>>(bytes)
            .map(ApiResponse::Results)
            .map_err(|err| ApiError::Decode(err.to_string())),
    }
}
