use std::sync::Arc;

use uuid::Uuid;

use crate::api::resources::Resource;
use crate::api::ApiClient;
use crate::catalog::{CatalogSnapshot, ResourceTypeCatalog};
use crate::config::ClientConfig;
use crate::crypto::{CryptoProvider, OpenPgpCrypto};
use crate::error::Error;
use crate::handshake;
use crate::key_directory::{ClientIdentity, KeyDirectory, ServerIdentity};
use crate::session::{self, Session};
use crate::submission::{ResourceSubmission, SecretPipeline};

/// Who is logged in and with which tokens.
struct Login<C: CryptoProvider> {
    user_id: Uuid,
    client: Arc<ClientIdentity<C::SecretKey>>,
    server: Arc<ServerIdentity<C::PublicKey>>,
    session: Session,
}

/// A client for a single vault.
///
/// Owns the server key cache, the current session and the resource type
/// catalog. Operations that change any of those take `&mut self`; the rest
/// can run concurrently.
pub struct VaultClient<C: CryptoProvider = OpenPgpCrypto> {
    config: ClientConfig,
    api: ApiClient,
    crypto: C,
    keys: KeyDirectory<C::PublicKey>,
    login: Option<Login<C>>,
    catalog: ResourceTypeCatalog,
}

impl<C: CryptoProvider + Default> VaultClient<C> {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Self::with_crypto(config, C::default())
    }
}

impl<C: CryptoProvider> VaultClient<C> {
    pub fn with_crypto(config: ClientConfig, crypto: C) -> Result<Self, Error> {
        let api = ApiClient::new(&config.base_url, config.request_timeout)
            .map_err(Error::network)?;
        Ok(Self {
            config,
            api,
            crypto,
            keys: KeyDirectory::default(),
            login: None,
            catalog: ResourceTypeCatalog::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The server identity, fetched on first use and cached until logout.
    pub async fn server_identity(&mut self) -> Result<Arc<ServerIdentity<C::PublicKey>>, Error> {
        self.keys.get_or_fetch(&self.api, &self.crypto).await
    }

    /// Log in as `user_id` and load the resource type catalog.
    ///
    /// A previous session is logged out first. That logout is best effort:
    /// a failure is logged and the new login goes ahead. If the catalog cannot be
    /// loaded the login still succeeds with an empty catalog; call
    /// [`Self::refresh_resource_types`] to retry.
    pub async fn login(
        &mut self,
        user_id: Uuid,
        client: Arc<ClientIdentity<C::SecretKey>>,
    ) -> Result<(), Error> {
        if let Some(previous) = self.login.take() {
            if let Err(e) = session::logout(&self.api, &previous.session).await {
                tracing::warn!("login: could not end the previous session: {}", e);
            }
        }
        self.catalog.clear();

        let server = self.server_identity().await?;
        let session = handshake::login(
            &self.api,
            &self.crypto,
            &self.config,
            user_id,
            &client,
            &server,
        )
        .await?;

        if let Err(e) = self.catalog.refresh(&self.api, &session).await {
            tracing::warn!("login: could not load resource types: {}", e);
        }

        self.login = Some(Login {
            user_id,
            client,
            server,
            session,
        });
        Ok(())
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.login.as_ref().map(|l| &l.session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.login.is_some()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.login.as_ref().map(|l| l.user_id)
    }

    /// End the session.
    ///
    /// The server is notified first, then local state is cleared whatever
    /// the outcome. A notification failure is still returned. Without a
    /// session this is a no-op.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let Some(login) = self.login.take() else {
            return Ok(());
        };

        let result = session::logout(&self.api, &login.session).await;
        drop(login);
        self.catalog.clear();
        self.keys.clear();

        match &result {
            Ok(()) => tracing::info!("logged out"),
            Err(e) => tracing::warn!("logout: server was not notified: {}", e),
        }
        result
    }

    /// Swap the access token for a fresh one using the refresh token.
    pub async fn refresh_session(&mut self) -> Result<(), Error> {
        let login = self.login.as_mut().ok_or(Error::NotAuthenticated)?;
        login.session = session::refresh(&self.api, login.user_id, &login.session).await?;
        tracing::debug!("session refreshed");
        Ok(())
    }

    /// Reload the resource type catalog. On failure the previous catalog
    /// stays in place.
    pub async fn refresh_resource_types(&mut self) -> Result<Arc<CatalogSnapshot>, Error> {
        let login = self.login.as_ref().ok_or(Error::NotAuthenticated)?;
        self.catalog.refresh(&self.api, &login.session).await
    }

    pub fn resource_types(&self) -> Arc<CatalogSnapshot> {
        self.catalog.snapshot()
    }

    /// Encrypt and store a new resource, returning its id.
    pub async fn add_resource(&self, submission: ResourceSubmission) -> Result<Uuid, Error> {
        let catalog = self.catalog.snapshot();
        self.pipeline()?.submit(&catalog, submission).await
    }

    pub async fn delete_resource(&self, id: Uuid) -> Result<(), Error> {
        self.pipeline()?.delete(id).await
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>, Error> {
        self.pipeline()?.list().await
    }

    fn pipeline(&self) -> Result<SecretPipeline<'_, C>, Error> {
        let login = self.login.as_ref().ok_or(Error::NotAuthenticated)?;
        Ok(SecretPipeline {
            api: &self.api,
            crypto: &self.crypto,
            session: &login.session,
            client: &login.client,
            server: &login.server,
        })
    }
}
