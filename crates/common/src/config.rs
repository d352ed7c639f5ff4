use std::time::Duration;

use url::Url;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// How far in the future the login challenge's expiry is set
pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(2 * 60);
/// Version of the JWT challenge payload
pub const PROTOCOL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the vault, e.g. `https://vault.example.com`
    pub base_url: Url,
    /// Applied to every HTTP call
    pub request_timeout: Duration,
    /// Lifetime advertised in the challenge's `verify_token_expiry`
    pub challenge_ttl: Duration,
    pub protocol_version: String,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            challenge_ttl: DEFAULT_CHALLENGE_TTL,
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_challenge_ttl(mut self, ttl: Duration) -> Self {
        self.challenge_ttl = ttl;
        self
    }

    /// The `domain` the challenge is bound to: the base URL without a trailing slash.
    pub fn domain(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_domain_strips_trailing_slash() {
        let config = ClientConfig::new(Url::parse("https://vault.example.com").unwrap());
        assert_eq!(config.domain(), "https://vault.example.com");

        let config = ClientConfig::new(Url::parse("https://example.com/passbolt/").unwrap());
        assert_eq!(config.domain(), "https://example.com/passbolt");
    }
}
