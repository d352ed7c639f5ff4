use pgp::composed::{Deserializable, SignedPublicKey, SignedSecretKey};
use pgp::types::SecretKeyTrait;

use super::CryptoError;

/// A transferable OpenPGP public key: the primary key plus its subkeys.
///
/// The primary key verifies signatures; messages are encrypted to the first
/// encryption-capable subkey, or to the primary key when it can encrypt.
///
/// # Examples
///
/// ```ignore
/// let armored = std::fs::read_to_string("server.pub.asc")?;
/// let key = PublicKey::from_armored(&armored)?;
/// ```
#[derive(Debug, Clone)]
pub struct PublicKey(SignedPublicKey);

impl PublicKey {
    /// Parse an ASCII-armored `PUBLIC KEY BLOCK` and check its self-signatures.
    pub fn from_armored(armored: &str) -> Result<Self, CryptoError> {
        let (key, _headers) = SignedPublicKey::from_string(armored)
            .map_err(|e| CryptoError::KeyParse(e.to_string()))?;
        key.verify()
            .map_err(|e| CryptoError::KeyParse(format!("bad self-signature: {}", e)))?;
        Ok(PublicKey(key))
    }

    pub(crate) fn inner(&self) -> &SignedPublicKey {
        &self.0
    }
}

/// An OpenPGP secret key together with the passphrase that unlocks it.
///
/// The key stays encrypted in memory; it is unlocked for each signing or
/// decryption operation.
#[derive(Clone)]
pub struct SecretKey {
    key: SignedSecretKey,
    passphrase: String,
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl SecretKey {
    /// Parse an ASCII-armored `PRIVATE KEY BLOCK` and check that `passphrase`
    /// unlocks it. Pass an empty passphrase for an unprotected key.
    pub fn from_armored(armored: &str, passphrase: impl Into<String>) -> Result<Self, CryptoError> {
        let (key, _headers) = SignedSecretKey::from_string(armored)
            .map_err(|e| CryptoError::KeyParse(e.to_string()))?;
        key.verify()
            .map_err(|e| CryptoError::KeyParse(format!("bad self-signature: {}", e)))?;

        let secret = SecretKey {
            key,
            passphrase: passphrase.into(),
        };
        secret
            .key
            .unlock(secret.passphrase_fn(), |_| Ok(()))
            .map_err(|e| CryptoError::Unlock(e.to_string()))?;
        Ok(secret)
    }

    pub(crate) fn inner(&self) -> &SignedSecretKey {
        &self.key
    }

    /// Passphrase callback in the shape the OpenPGP operations take.
    pub(crate) fn passphrase_fn(&self) -> impl FnOnce() -> String + Clone {
        let passphrase = self.passphrase.clone();
        move || passphrase
    }
}
