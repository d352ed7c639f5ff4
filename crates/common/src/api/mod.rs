//! Typed access to the vault's JSON API.
//!
//! Every endpoint is a request type implementing [`ApiRequest`]; the request
//! knows its method, path and body, and names the type its response `body`
//! decodes into. [`ApiClient`] does the sending, unwraps the server's
//! `{header, body}` envelope and turns non-2xx statuses into [`ServerError`].

pub mod auth;
mod client;
mod error;
pub mod resources;

pub use client::ApiClient;
pub use error::{ApiError, ServerError};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// A single API call: how to build it and what its body decodes into.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// The envelope every server response is wrapped in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub header: Option<ResponseHeader>,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Response metadata. Every field is optional; servers differ in what they fill in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub servertime: Option<i64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}

/// Resolve an endpoint path against the base URL, keeping any path prefix
/// the base carries (e.g. a vault served under `/passbolt/`).
pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, ApiError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_endpoint_on_bare_host() {
        let base = Url::parse("https://vault.example.com").unwrap();
        let url = endpoint(&base, "/auth/verify.json").unwrap();
        assert_eq!(url.as_str(), "https://vault.example.com/auth/verify.json");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let base = Url::parse("https://example.com/passbolt").unwrap();
        let url = endpoint(&base, "resources.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/passbolt/resources.json");

        let base = Url::parse("https://example.com/passbolt/").unwrap();
        let url = endpoint(&base, "/auth/jwt/login.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/passbolt/auth/jwt/login.json");
    }

    #[test]
    fn test_envelope_tolerates_missing_parts() {
        let envelope: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(envelope.header.is_none());
        assert!(envelope.body.is_null());

        let envelope: ApiResponse =
            serde_json::from_str(r#"{"header":{"status":"success","code":200},"body":[1]}"#)
                .unwrap();
        let header = envelope.header.unwrap();
        assert_eq!(header.code, Some(200));
        assert_eq!(header.status.as_deref(), Some("success"));
        assert_eq!(envelope.body, serde_json::json!([1]));
    }
}
