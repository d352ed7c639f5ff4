//! OpenPGP sign-then-encrypt, armored as `PGP MESSAGE` blocks.

use pgp::composed::{Deserializable, Message};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::PublicKeyTrait;

use super::keys::{PublicKey, SecretKey};
use super::{CryptoError, CryptoProvider};

/// First line of every armored message
pub const MESSAGE_ARMOR_HEADER: &str = "-----BEGIN PGP MESSAGE-----";

const HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::SHA2_256;
const SYMMETRIC_ALGORITHM: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

/// [`CryptoProvider`] backed by `pgp`, compatible with any OpenPGP peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPgpCrypto;

impl CryptoProvider for OpenPgpCrypto {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;

    fn parse_public_key(&self, armored: &str) -> Result<PublicKey, CryptoError> {
        PublicKey::from_armored(armored)
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        recipient: &PublicKey,
        signer: &SecretKey,
    ) -> Result<String, CryptoError> {
        let mut rng = rand::thread_rng();

        let signed = Message::new_literal_bytes("", plaintext)
            .sign(
                &mut rng,
                signer.inner(),
                signer.passphrase_fn(),
                HASH_ALGORITHM,
            )
            .map_err(|e| CryptoError::Encrypt(format!("signing failed: {}", e)))?;

        let recipient = recipient.inner();
        let encryption_subkey = recipient
            .public_subkeys
            .iter()
            .find(|subkey| subkey.is_encryption_key());
        let encrypted = match encryption_subkey {
            Some(subkey) => {
                signed.encrypt_to_keys_seipdv1(&mut rng, SYMMETRIC_ALGORITHM, &[subkey])
            }
            None if recipient.primary_key.is_encryption_key() => signed.encrypt_to_keys_seipdv1(
                &mut rng,
                SYMMETRIC_ALGORITHM,
                &[&recipient.primary_key],
            ),
            None => {
                return Err(CryptoError::Encrypt(
                    "recipient key has no encryption-capable key".into(),
                ))
            }
        }
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

        encrypted
            .to_armored_string(Default::default())
            .map_err(|e| CryptoError::Armor(e.to_string()))
    }

    fn decrypt(
        &self,
        armored: &str,
        recipient: &SecretKey,
        sender: &PublicKey,
    ) -> Result<Vec<u8>, CryptoError> {
        let (message, _headers) =
            Message::from_string(armored).map_err(|e| CryptoError::Armor(e.to_string()))?;

        let (message, _key_ids) = message
            .decrypt(recipient.passphrase_fn(), &[recipient.inner()])
            .map_err(|e| CryptoError::Decrypt(e.to_string()))?;
        let message = message
            .decompress()
            .map_err(|e| CryptoError::Decrypt(e.to_string()))?;

        if !matches!(message, Message::Signed { .. }) {
            return Err(CryptoError::Signature("message is not signed".into()));
        }
        let sender = sender.inner();
        let signed_by_sender = message.verify(&sender.primary_key).is_ok()
            || sender
                .public_subkeys
                .iter()
                .any(|subkey| message.verify(subkey).is_ok());
        if !signed_by_sender {
            return Err(CryptoError::Signature(
                "message was not signed by the expected key".into(),
            ));
        }

        message
            .get_content()
            .map_err(|e| CryptoError::Decrypt(e.to_string()))?
            .ok_or_else(|| CryptoError::Decrypt("message has no literal data".into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::fixtures;

    #[test]
    fn test_output_is_armored_pgp_message() {
        let armored = OpenPgpCrypto
            .encrypt(
                b"hunter2",
                &fixtures::server_public(),
                &fixtures::client_secret(),
            )
            .unwrap();

        assert!(armored.starts_with(MESSAGE_ARMOR_HEADER));
        assert!(armored.trim_end().ends_with("-----END PGP MESSAGE-----"));
        assert!(!armored.contains("hunter2"));
    }

    #[test]
    fn test_server_reads_client_message() {
        let armored = OpenPgpCrypto
            .encrypt(
                b"hunter2",
                &fixtures::server_public(),
                &fixtures::client_secret(),
            )
            .unwrap();

        let plaintext = OpenPgpCrypto
            .decrypt(
                &armored,
                &fixtures::server_secret(),
                &fixtures::client_public(),
            )
            .unwrap();
        assert_eq!(plaintext, b"hunter2");
    }

    #[test]
    fn test_reads_gnupg_message() {
        let plaintext = OpenPgpCrypto
            .decrypt(
                fixtures::GNUPG_MESSAGE,
                &fixtures::client_secret(),
                &fixtures::server_public(),
            )
            .unwrap();
        assert_eq!(plaintext, b"hello from gnupg");
    }

    #[test]
    fn test_wrong_sender_fails_verification() {
        let err = OpenPgpCrypto
            .decrypt(
                fixtures::GNUPG_MESSAGE,
                &fixtures::client_secret(),
                &fixtures::client_public(),
            )
            .unwrap_err();
        assert!(matches!(err, CryptoError::Signature(_)));
    }

    #[test]
    fn test_wrong_recipient_cannot_decrypt() {
        let err = OpenPgpCrypto
            .decrypt(
                fixtures::GNUPG_MESSAGE,
                &fixtures::server_secret(),
                &fixtures::server_public(),
            )
            .unwrap_err();
        assert!(matches!(err, CryptoError::Decrypt(_)));
    }

    #[test]
    fn test_garbage_armor_is_rejected() {
        let err = OpenPgpCrypto
            .decrypt(
                "-----BEGIN VAULT MESSAGE-----\nAAAA\n-----END VAULT MESSAGE-----\n",
                &fixtures::client_secret(),
                &fixtures::server_public(),
            )
            .unwrap_err();
        assert!(matches!(err, CryptoError::Armor(_)));
    }
}
