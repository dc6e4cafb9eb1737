use songvote_core::endpoint::{AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE};
use songvote_core::{bearer, decode_response, join_url, ApiError, ApiRequest, ApiResponse, Method};
use tracing::debug;
use url::Url;

/// Sends one [`ApiRequest`] and interprets the reply.
pub(crate) trait Transport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub(crate) struct HttpTransport {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub(crate) fn new(base_url: &str, token: Option<String>) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn url_for(&self, path: &str) -> String {
        join_url(self.base.as_str(), path)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.path);
        debug!(method = request.method.as_str(), %url, "sending request");
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };
        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, bearer(token));
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        decode_response(request.expects, &bytes)
    }
}
