//! Session tokens and their lifecycle after the handshake: logout and refresh.
//!
//! Tokens are bearer secrets. Neither [`BearerToken`] nor [`Session`] can be
//! serialized, and their `Debug` output is redacted.

use std::fmt;

use uuid::Uuid;

use crate::api::auth::{LogoutRequest, RefreshRequest};
use crate::api::ApiClient;
use crate::error::Error;

/// An opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for placing in a header or request body.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// The access/refresh token pair issued by a successful login.
#[derive(Clone)]
pub struct Session {
    access_token: BearerToken,
    refresh_token: BearerToken,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token)
            .finish()
    }
}

impl Session {
    pub fn new(access_token: BearerToken, refresh_token: BearerToken) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    pub fn access_token(&self) -> &BearerToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &BearerToken {
        &self.refresh_token
    }
}

/// Tell the server to revoke `session`'s refresh token.
///
/// Callers clear their local copy of the session whatever this returns.
pub async fn logout(api: &ApiClient, session: &Session) -> Result<(), Error> {
    let request = LogoutRequest {
        refresh_token: session.refresh_token.expose().to_string(),
    };
    api.call_authenticated(request, &session.access_token)
        .await
        .map_err(Error::network)?;
    Ok(())
}

/// Exchange the refresh token for a new access token.
///
/// The refresh token is kept unless the server rotates it.
pub async fn refresh(api: &ApiClient, user_id: Uuid, session: &Session) -> Result<Session, Error> {
    let request = RefreshRequest {
        user_id,
        refresh_token: session.refresh_token.expose().to_string(),
    };
    let response = api.call(request).await.map_err(Error::network)?;

    let access_token = BearerToken::new(response.access_token);
    if access_token.is_empty() {
        return Err(Error::Protocol("refresh returned an empty access token".into()));
    }

    let refresh_token = match response.refresh_token {
        Some(token) if !token.is_empty() => BearerToken::new(token),
        _ => session.refresh_token.clone(),
    };

    Ok(Session::new(access_token, refresh_token))
}
