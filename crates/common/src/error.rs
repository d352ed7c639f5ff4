use crate::api::{ApiError, ServerError};
use crate::crypto::CryptoError;

/// Failure taxonomy of the vault client.
///
/// Lets callers tell "could not reach the server" (`Network`) from
/// "authentication rejected" (`Auth`) from "bad request" (`Validation`,
/// `Api`).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(ApiError),
    #[error("could not parse key material: {0}")]
    KeyParse(CryptoError),
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("encryption failed: {0}")]
    Encryption(CryptoError),
    #[error("api error: {0}")]
    Api(ServerError),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("no active session, log in first")]
    NotAuthenticated,
}

impl Error {
    /// Classify an API failure for calls where a non-2xx is unexpected.
    pub(crate) fn network(err: ApiError) -> Self {
        match err {
            ApiError::Decode(e) => Error::Protocol(e.to_string()),
            other => Error::Network(other),
        }
    }

    /// Classify an API failure for calls where the server may legitimately
    /// refuse the request with an application error.
    pub(crate) fn api(err: ApiError) -> Self {
        match err {
            ApiError::Server(e) => Error::Api(e),
            other => Error::network(other),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The decrypted reply echoed a different verify token than the one sent.
    #[error("token mismatch")]
    TokenMismatch,
    #[error("login rejected: {0}")]
    Rejected(ServerError),
    #[error("could not open server reply: {0}")]
    Reply(CryptoError),
    #[error("malformed server reply: {0}")]
    MalformedReply(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
