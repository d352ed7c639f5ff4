//! Endpoints under `/auth`: the server key and the JWT login lifecycle.

use reqwest::{Client, RequestBuilder};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{endpoint, ApiError, ApiRequest};

/// `GET /auth/verify.json`: the server's public key.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyRequest;

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub fingerprint: Option<String>,
    pub keydata: String,
}

impl ApiRequest for VerifyRequest {
    type Response = VerifyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, "auth/verify.json")?))
    }
}

/// `POST /auth/jwt/login.json`: submit the encrypted challenge.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub user_id: Uuid,
    pub challenge: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub challenge: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .post(endpoint(base_url, "auth/jwt/login.json")?)
            .json(&self))
    }
}

/// `POST /auth/jwt/logout.json`: revoke the refresh token.
// no Debug: carries a bearer secret
#[derive(Clone, Serialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

impl ApiRequest for LogoutRequest {
    type Response = IgnoredAny;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .post(endpoint(base_url, "auth/jwt/logout.json")?)
            .json(&self))
    }
}

/// `POST /auth/jwt/refresh.json`: trade a refresh token for a new access token.
#[derive(Clone, Serialize)]
pub struct RefreshRequest {
    pub user_id: Uuid,
    pub refresh_token: String,
}

#[derive(Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl ApiRequest for RefreshRequest {
    type Response = RefreshResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .post(endpoint(base_url, "auth/jwt/refresh.json")?)
            .json(&self))
    }
}
