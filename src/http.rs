use gloo::net::http::{Request, RequestBuilder};
use songvote_core::endpoint::{AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE};
use songvote_core::{bearer, decode_response, join_url, ApiError, ApiRequest, ApiResponse, Method};

use crate::token_store;

/// Sends a request with the stored bearer token and decodes the reply.
pub(crate) async fn send(api_base: &str, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let url = join_url(api_base, &request.path);
    let mut builder: RequestBuilder = match request.method {
        Method::Get => Request::get(&url),
        Method::Post => Request::post(&url),
        Method::Put => Request::put(&url),
    };
    builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    if let Some(token) = token_store::token() {
        builder = builder.header(AUTHORIZATION, &bearer(&token));
    }
    let prepared = match &request.body {
        Some(body) => builder.body(body.clone()),
        None => builder.build(),
    }
    .map_err(|err| ApiError::Network(err.to_string()))?;

    let response = prepared
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    let bytes = response
        .binary()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    decode_response(request.expects, &bytes)
}
