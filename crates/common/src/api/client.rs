use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use super::error::{ApiError, ServerError};
use super::{ApiRequest, ApiResponse};
use crate::session::BearerToken;

#[derive(Debug, Clone)]
pub struct ApiClient {
    remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Send an unauthenticated request.
    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        self.send(request, None).await
    }

    /// Send a request carrying `Authorization: Bearer <token>`.
    pub async fn call_authenticated<T: ApiRequest>(
        &self,
        request: T,
        token: &BearerToken,
    ) -> Result<T::Response, ApiError> {
        self.send(request, Some(token)).await
    }

    async fn send<T: ApiRequest>(
        &self,
        request: T,
        token: Option<&BearerToken>,
    ) -> Result<T::Response, ApiError> {
        let mut request_builder = request.build_request(&self.remote, &self.client)?;
        if let Some(token) = token {
            request_builder = request_builder.bearer_auth(token.expose());
        }

        let response = request_builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "api response");

        let text = response.text().await?;
        if !status.is_success() {
            return Err(ServerError::from_body(status, &text).into());
        }

        let envelope: ApiResponse = serde_json::from_str(&text)?;
        Ok(serde_json::from_value(envelope.body)?)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }
}
