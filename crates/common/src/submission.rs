//! Encrypt-then-submit for secret material, plus resource listing and deletion.
//!
//! A submission is checked against the resource type catalog and its
//! required fields before anything is encrypted, and the password only ever
//! leaves this module as armored ciphertext.

use std::fmt;

use uuid::Uuid;

use crate::api::resources::{
    CreateResourceRequest, DeleteResourceRequest, ListResourcesRequest, Resource, SecretData,
};
use crate::api::ApiClient;
use crate::catalog::CatalogSnapshot;
use crate::crypto::CryptoProvider;
use crate::error::{Error, ValidationError};
use crate::key_directory::{ClientIdentity, ServerIdentity};
use crate::session::Session;

/// A new resource as supplied by the caller.
#[derive(Clone)]
pub struct ResourceSubmission {
    /// Resource type slug, e.g. `password-string`
    pub resource_type: String,
    pub name: String,
    pub username: Option<String>,
    pub uri: Option<String>,
    pub description: Option<String>,
    pub password: String,
}

impl fmt::Debug for ResourceSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSubmission")
            .field("resource_type", &self.resource_type)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("uri", &self.uri)
            .field("description", &self.description)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ResourceSubmission {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            username: None,
            uri: None,
            description: None,
            password: password.into(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Everything a secret operation needs from an established session.
pub struct SecretPipeline<'a, C: CryptoProvider> {
    pub api: &'a ApiClient,
    pub crypto: &'a C,
    pub session: &'a Session,
    pub client: &'a ClientIdentity<C::SecretKey>,
    pub server: &'a ServerIdentity<C::PublicKey>,
}

impl<C: CryptoProvider> SecretPipeline<'_, C> {
    /// Validate, encrypt and submit a new resource, returning its server id.
    pub async fn submit(
        &self,
        catalog: &CatalogSnapshot,
        submission: ResourceSubmission,
    ) -> Result<Uuid, Error> {
        let request = prepare(self.crypto, catalog, self.client, self.server, submission)?;

        let created = self
            .api
            .call_authenticated(request, self.session.access_token())
            .await
            .map_err(Error::api)?;

        tracing::info!(id = %created.id, "new resource created");
        Ok(created.id)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        self.api
            .call_authenticated(DeleteResourceRequest { id }, self.session.access_token())
            .await
            .map_err(Error::api)?;

        tracing::info!(%id, "resource deleted");
        Ok(())
    }

    /// Every resource visible to the user, in one unpaginated response.
    pub async fn list(&self) -> Result<Vec<Resource>, Error> {
        self.api
            .call_authenticated(ListResourcesRequest, self.session.access_token())
            .await
            .map_err(Error::network)
    }
}

/// Turn a submission into a ready-to-send request.
///
/// Validation happens first: an unknown type slug or an empty required field
/// fails before the password is touched.
pub fn prepare<C: CryptoProvider>(
    crypto: &C,
    catalog: &CatalogSnapshot,
    client: &ClientIdentity<C::SecretKey>,
    server: &ServerIdentity<C::PublicKey>,
    submission: ResourceSubmission,
) -> Result<CreateResourceRequest, Error> {
    if submission.resource_type.is_empty() {
        return Err(ValidationError::MissingField("resource_type").into());
    }
    let resource_type_id = catalog
        .resolve(&submission.resource_type)
        .ok_or_else(|| ValidationError::UnknownResourceType(submission.resource_type.clone()))?
        .to_string();

    if submission.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name").into());
    }
    if submission.password.is_empty() {
        return Err(ValidationError::MissingField("password").into());
    }

    tracing::debug!(resource_type = %submission.resource_type, "encrypting secret");
    let data = crypto
        .encrypt(submission.password.as_bytes(), server.key(), client.key())
        .map_err(Error::Encryption)?;

    Ok(CreateResourceRequest {
        name: submission.name,
        username: submission.username,
        uri: submission.uri,
        description: submission.description,
        resource_type_id,
        secrets: vec![SecretData { data }],
    })
}
