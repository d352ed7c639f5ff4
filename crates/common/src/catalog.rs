//! The server-declared resource types, cached per session.
//!
//! Consumers only ever see an immutable [`CatalogSnapshot`]; a refresh builds
//! a new snapshot and swaps it in whole. A failed refresh leaves the previous
//! snapshot in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::resources::{ResourceType, ResourceTypesRequest};
use crate::api::ApiClient;
use crate::error::Error;
use crate::session::Session;

/// Immutable mapping from resource type slug to the server's type id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    types: BTreeMap<String, String>,
}

impl CatalogSnapshot {
    /// Build a snapshot from server records. A repeated slug keeps the last id.
    pub fn from_types<I>(types: I) -> Self
    where
        I: IntoIterator<Item = ResourceType>,
    {
        let types = types
            .into_iter()
            .map(|t| (t.slug, t.id))
            .collect::<BTreeMap<_, _>>();
        Self { types }
    }

    /// Type id for `slug`, if the server declared it.
    pub fn resolve(&self, slug: &str) -> Option<&str> {
        self.types.get(slug).map(String::as_str)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.types.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `(slug, id)` pairs ordered by slug.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(s, i)| (s.as_str(), i.as_str()))
    }
}

#[derive(Debug, Default)]
pub struct ResourceTypeCatalog {
    snapshot: Arc<CatalogSnapshot>,
}

impl ResourceTypeCatalog {
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.clone()
    }

    /// Fetch `/resource-types.json` and replace the snapshot.
    pub async fn refresh(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<Arc<CatalogSnapshot>, Error> {
        let types = api
            .call_authenticated(ResourceTypesRequest, session.access_token())
            .await
            .map_err(Error::network)?;

        let snapshot = Arc::new(CatalogSnapshot::from_types(types));
        tracing::debug!(count = snapshot.len(), "resource types refreshed");

        self.snapshot = snapshot.clone();
        Ok(snapshot)
    }

    pub fn clear(&mut self) {
        self.snapshot = Arc::default();
    }
}
