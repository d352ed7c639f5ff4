//! Fetching and caching the server's public key.

use std::sync::Arc;

use crate::api::auth::VerifyRequest;
use crate::api::ApiClient;
use crate::crypto::CryptoProvider;
use crate::error::Error;

/// The server's public key material, as fetched from the key directory.
#[derive(Debug, Clone)]
pub struct ServerIdentity<K> {
    key: K,
    armored: String,
    fingerprint: Option<String>,
}

impl<K> ServerIdentity<K> {
    pub fn new(key: K, armored: String, fingerprint: Option<String>) -> Self {
        Self {
            key,
            armored,
            fingerprint,
        }
    }

    /// Parsed key, for use with a crypto provider
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Key material exactly as served
    pub fn armored(&self) -> &str {
        &self.armored
    }

    /// Fingerprint as reported by the server, if any
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }
}

/// The caller's private key material. Loaded and unlocked by the caller; the
/// client only holds a shared reference for the session's duration.
#[derive(Debug)]
pub struct ClientIdentity<K> {
    key: K,
}

impl<K> ClientIdentity<K> {
    pub fn new(key: K) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Fetch the server key from `/auth/verify.json` and parse it.
///
/// Fails closed: any transport failure, non-2xx status or unparseable key is
/// an error, never a partial identity.
pub async fn fetch_server_identity<C: CryptoProvider>(
    api: &ApiClient,
    crypto: &C,
) -> Result<ServerIdentity<C::PublicKey>, Error> {
    let response = api.call(VerifyRequest).await.map_err(Error::network)?;
    let key = crypto
        .parse_public_key(&response.keydata)
        .map_err(Error::KeyParse)?;

    tracing::debug!(fingerprint = ?response.fingerprint, "fetched server key");

    Ok(ServerIdentity::new(
        key,
        response.keydata,
        response.fingerprint,
    ))
}

/// Caches the server identity for the lifetime of a session.
#[derive(Debug)]
pub struct KeyDirectory<K> {
    cached: Option<Arc<ServerIdentity<K>>>,
}

impl<K> Default for KeyDirectory<K> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<K> KeyDirectory<K> {
    pub fn cached(&self) -> Option<Arc<ServerIdentity<K>>> {
        self.cached.clone()
    }

    /// Return the cached identity, fetching it first if there is none.
    pub async fn get_or_fetch<C>(
        &mut self,
        api: &ApiClient,
        crypto: &C,
    ) -> Result<Arc<ServerIdentity<K>>, Error>
    where
        C: CryptoProvider<PublicKey = K>,
    {
        if let Some(identity) = &self.cached {
            return Ok(identity.clone());
        }

        let identity = Arc::new(fetch_server_identity(api, crypto).await?);
        self.cached = Some(identity.clone());
        Ok(identity)
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}
