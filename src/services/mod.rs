use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Entity, EntityId},
    response::Page,
};

pub mod auth_service;
pub mod cache;
pub mod product_service;
pub mod reference_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use product_service::ProductService;
pub use reference_service::{CategoryService, ReferenceService, SiteService};
pub use user_service::UserService;

/// The four operations a CRUD screen needs from an entity family.
#[async_trait]
pub trait CrudResource<E: Entity>: Send + Sync {
    type Query: Clone + Default + Send + Sync;

    async fn list(&self, query: &Self::Query) -> AppResult<Page<E>>;
    async fn create(&self, entity: &E) -> AppResult<E>;
    async fn update(&self, id: &EntityId, entity: &E) -> AppResult<E>;
    async fn delete(&self, id: &EntityId) -> AppResult<()>;
}
