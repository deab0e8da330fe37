use async_trait::async_trait;
use reqwest::Method;

use crate::{
    client::ApiClient,
    dto::users::user_payload,
    error::AppResult,
    models::{EntityId, User},
    response::{DataResponse, MaybeWrapped, Page},
    services::{CrudResource, cache::QueryCache},
};

const USERS_PATH: &str = "/api/back-office/users";

/// Users come back as one unpaginated list; the table pages them locally.
pub struct UserService {
    client: ApiClient,
    cache: QueryCache<(), Vec<User>>,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache<(), Vec<User>> {
        &self.cache
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.cache
            .get_or_fetch((), || async {
                let resp: DataResponse<Option<Vec<User>>> =
                    self.client.get(USERS_PATH).await?;
                Ok(resp.data.unwrap_or_default())
            })
            .await
    }

    pub async fn create_user(&self, user: &User) -> AppResult<User> {
        let resp: MaybeWrapped<User> = self
            .client
            .send_json(Method::POST, USERS_PATH, &user_payload(user))
            .await?;
        self.cache.invalidate();
        Ok(resp.into_inner())
    }

    /// Updates go through POST on the member path, not PUT.
    pub async fn update_user(&self, id: &EntityId, user: &User) -> AppResult<User> {
        let path = format!("{USERS_PATH}/{id}");
        let resp: MaybeWrapped<User> = self
            .client
            .send_json(Method::POST, &path, &user_payload(user))
            .await?;
        self.cache.invalidate();
        Ok(resp.into_inner())
    }

    pub async fn delete_user(&self, id: &EntityId) -> AppResult<()> {
        self.client
            .send_empty(Method::DELETE, &format!("{USERS_PATH}/{id}"))
            .await?;
        self.cache.invalidate();
        Ok(())
    }
}

#[async_trait]
impl CrudResource<User> for UserService {
    type Query = ();

    async fn list(&self, _query: &()) -> AppResult<Page<User>> {
        Ok(Page::whole(self.list_users().await?))
    }

    async fn create(&self, entity: &User) -> AppResult<User> {
        self.create_user(entity).await
    }

    async fn update(&self, id: &EntityId, entity: &User) -> AppResult<User> {
        self.update_user(id, entity).await
    }

    async fn delete(&self, id: &EntityId) -> AppResult<()> {
        self.delete_user(id).await
    }
}
