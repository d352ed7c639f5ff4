//! Public-key crypto capability consumed by the login handshake and the
//! secret submission pipeline.
//!
//! The protocol layers never touch key material directly. They go through
//! [`CryptoProvider`], which knows how to:
//!
//! - **Parse** the server's armored public key
//! - **Encrypt and sign** a plaintext for a recipient, producing armored text
//! - **Decrypt and verify** an armored message from a known sender
//!
//! # OpenPGP
//!
//! [`OpenPgpCrypto`] is the provider a Passbolt server expects. It works on
//! ASCII-armored OpenPGP keys and produces signed and encrypted
//! `-----BEGIN PGP MESSAGE-----` blocks.

mod keys;
mod openpgp;

pub use keys::{PublicKey, SecretKey};
pub use openpgp::{OpenPgpCrypto, MESSAGE_ARMOR_HEADER};

/// Errors surfaced by a crypto provider
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key parse error: {0}")]
    KeyParse(String),
    #[error("encryption failed: {0}")]
    Encrypt(String),
    #[error("decryption failed: {0}")]
    Decrypt(String),
    #[error("signature verification failed: {0}")]
    Signature(String),
    #[error("malformed armor: {0}")]
    Armor(String),
    #[error("could not unlock secret key: {0}")]
    Unlock(String),
}

/// The encrypt/decrypt/key-parsing capability the protocol is built on.
///
/// All ciphertexts cross this boundary as armored text, which is also the
/// wire format of every encrypted field the server sees.
pub trait CryptoProvider: Send + Sync {
    /// Public (verification + encryption) key material
    type PublicKey: Clone + Send + Sync;
    /// Private (decryption + signing) key material
    type SecretKey: Send + Sync;

    /// Parse armored public key material as served by the key directory.
    fn parse_public_key(&self, armored: &str) -> Result<Self::PublicKey, CryptoError>;

    /// Encrypt `plaintext` for `recipient`, signed by `signer`.
    fn encrypt(
        &self,
        plaintext: &[u8],
        recipient: &Self::PublicKey,
        signer: &Self::SecretKey,
    ) -> Result<String, CryptoError>;

    /// Decrypt an armored message addressed to `recipient` and verify that
    /// `sender` signed it.
    fn decrypt(
        &self,
        armored: &str,
        recipient: &Self::SecretKey,
        sender: &Self::PublicKey,
    ) -> Result<Vec<u8>, CryptoError>;
}
