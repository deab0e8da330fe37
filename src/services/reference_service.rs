use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::{
    client::ApiClient,
    error::AppResult,
    models::{Category, Site},
    services::cache::QueryCache,
};

/// Read-only lookup lists (categories, sites) that feed the dropdowns.
pub struct ReferenceService<T> {
    client: ApiClient,
    path: &'static str,
    cache: QueryCache<(), Vec<T>>,
    _entity: PhantomData<fn() -> T>,
}

pub type CategoryService = ReferenceService<Category>;
pub type SiteService = ReferenceService<Site>;

impl ReferenceService<Category> {
    pub fn categories(client: ApiClient) -> Self {
        Self::new(client, "/api/back-office/categories")
    }
}

impl ReferenceService<Site> {
    pub fn sites(client: ApiClient) -> Self {
        Self::new(client, "/api/back-office/sites")
    }
}

impl<T> ReferenceService<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            cache: QueryCache::new(),
            _entity: PhantomData,
        }
    }

    /// A `null` body counts as an empty list.
    pub async fn list(&self) -> AppResult<Vec<T>> {
        self.cache
            .get_or_fetch((), || async {
                let items: Option<Vec<T>> = self.client.get(self.path).await?;
                Ok(items.unwrap_or_default())
            })
            .await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
