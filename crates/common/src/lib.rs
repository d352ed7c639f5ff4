/**
 * Typed requests for the vault's JSON API,
 *  the HTTP client that sends them and
 *  server error parsing.
 */
pub mod api;
/**
 * Resource type slugs and the server ids
 *  they resolve to.
 */
pub mod catalog;
pub mod config;
/**
 * Cryptographic types and operations.
 *  - Armored OpenPGP public and secret keys
 *  - The crypto capability seam and its
 *    OpenPGP provider
 */
pub mod crypto;
pub mod error;
/**
 * Challenge-response login: build, seal and
 *  send the challenge, then open and check
 *  the server's reply.
 */
pub mod handshake;
pub mod key_directory;
pub mod session;
/**
 * Validation and encryption of new secrets
 *  before they are sent to the server.
 */
pub mod submission;
mod vault;

pub use vault::VaultClient;

pub mod prelude {
    pub use crate::api::resources::{Resource, ResourceType};
    pub use crate::catalog::CatalogSnapshot;
    pub use crate::config::ClientConfig;
    pub use crate::crypto::{CryptoProvider, OpenPgpCrypto, PublicKey, SecretKey};
    pub use crate::error::{AuthError, Error, ValidationError};
    pub use crate::key_directory::{ClientIdentity, ServerIdentity};
    pub use crate::session::{BearerToken, Session};
    pub use crate::submission::ResourceSubmission;
    pub use crate::VaultClient;
}
