//! The JWT login handshake.
//!
//! 1. Generate a random `verify_token`
//! 2. Build the [`Challenge`] bound to our domain, expiring after the configured TTL
//! 3. Encrypt it to the server key, signed with the client key
//! 4. `POST /auth/jwt/login.json` with the user id and the armored challenge
//! 5. Decrypt the armored reply, verifying the server's signature
//! 6. Require the reply to echo our `verify_token` exactly
//! 7. Take the access and refresh tokens from the reply

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::LoginRequest;
use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::crypto::CryptoProvider;
use crate::error::{AuthError, Error};
use crate::key_directory::{ClientIdentity, ServerIdentity};
use crate::session::{BearerToken, Session};

/// The nonce-bearing payload sent to the server. Created per login attempt,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub version: String,
    pub domain: String,
    pub verify_token: String,
    /// Epoch seconds
    pub verify_token_expiry: i64,
}

impl Challenge {
    pub fn new(version: impl Into<String>, domain: impl Into<String>, ttl: Duration) -> Self {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            version: version.into(),
            domain: domain.into(),
            verify_token: Uuid::new_v4().to_string(),
            verify_token_expiry: Utc::now().timestamp().saturating_add(ttl_secs),
        }
    }
}

/// The decrypted server reply. Everything is optional so a reply missing
/// its tokens can be told apart from one that is not JSON at all.
#[derive(Deserialize)]
struct ChallengeReply {
    #[serde(default)]
    verify_token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Run the handshake and return the new session.
///
/// No session exists unless every step succeeds.
pub async fn login<C: CryptoProvider>(
    api: &ApiClient,
    crypto: &C,
    config: &ClientConfig,
    user_id: Uuid,
    client: &ClientIdentity<C::SecretKey>,
    server: &ServerIdentity<C::PublicKey>,
) -> Result<Session, Error> {
    let challenge = Challenge::new(
        config.protocol_version.clone(),
        config.domain(),
        config.challenge_ttl,
    );
    let sealed = seal_challenge(crypto, &challenge, client, server)?;

    let response = api
        .call(LoginRequest {
            user_id,
            challenge: sealed,
        })
        .await
        .map_err(|e| match e {
            ApiError::Server(e) => Error::Auth(AuthError::Rejected(e)),
            ApiError::Decode(e) => Error::Auth(AuthError::MalformedReply(e.to_string())),
            other => Error::Network(other),
        })?;

    let session = open_reply(
        crypto,
        &response.challenge,
        &challenge.verify_token,
        client,
        server,
    )?;

    tracing::info!(%user_id, "login: JWT tokens retrieved");
    Ok(session)
}

/// Serialize `challenge` and encrypt it to the server, signed by the client.
pub fn seal_challenge<C: CryptoProvider>(
    crypto: &C,
    challenge: &Challenge,
    client: &ClientIdentity<C::SecretKey>,
    server: &ServerIdentity<C::PublicKey>,
) -> Result<String, Error> {
    let payload =
        serde_json::to_vec(challenge).map_err(|e| Error::Protocol(e.to_string()))?;
    crypto
        .encrypt(&payload, server.key(), client.key())
        .map_err(Error::Encryption)
}

/// Decrypt and verify the server's armored reply and check that it echoes
/// `expected_token`.
///
/// A mismatching token is a hard failure: it may be a replay or a spoofed
/// server.
pub fn open_reply<C: CryptoProvider>(
    crypto: &C,
    armored: &str,
    expected_token: &str,
    client: &ClientIdentity<C::SecretKey>,
    server: &ServerIdentity<C::PublicKey>,
) -> Result<Session, AuthError> {
    let plaintext = crypto
        .decrypt(armored, client.key(), server.key())
        .map_err(AuthError::Reply)?;

    let reply: ChallengeReply = serde_json::from_slice(&plaintext)
        .map_err(|e| AuthError::MalformedReply(e.to_string()))?;

    if reply.verify_token.as_deref() != Some(expected_token) {
        tracing::warn!("login: verify token mismatch in server reply");
        return Err(AuthError::TokenMismatch);
    }

    let access_token = reply
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::MalformedReply("missing access_token".into()))?;
    let refresh_token = reply
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::MalformedReply("missing refresh_token".into()))?;

    Ok(Session::new(
        BearerToken::new(access_token),
        BearerToken::new(refresh_token),
    ))
}
