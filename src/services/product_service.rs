use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::{
    client::ApiClient,
    dto::products::{ProductEncoding, product_multipart},
    error::AppResult,
    models::{EntityId, Product},
    response::{MaybeWrapped, Page, PagedResponse},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::{CrudResource, cache::QueryCache},
};

const PRODUCTS_PATH: &str = "/api/products";

/// Query string of the list endpoint. Unset filters are left out entirely.
#[derive(Debug, Serialize)]
struct ProductListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a EntityId>,
    sort_by: ProductSortBy,
    sort_order: SortOrder,
    page: u32,
    per_page: u32,
    paginate: bool,
}

impl<'a> From<&'a ProductQuery> for ProductListParams<'a> {
    fn from(query: &'a ProductQuery) -> Self {
        Self {
            name: query.name.as_deref(),
            category_id: query.category_id.as_ref(),
            sort_by: query.sort_by,
            sort_order: query.sort_order,
            page: query.page,
            per_page: query.per_page,
            paginate: true,
        }
    }
}

pub struct ProductService {
    client: ApiClient,
    cache: QueryCache<ProductQuery, Page<Product>>,
}

impl ProductService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache<ProductQuery, Page<Product>> {
        &self.cache
    }

    pub async fn list_products(&self, query: &ProductQuery) -> AppResult<Page<Product>> {
        let query = query.normalized();
        self.cache
            .get_or_fetch(query.clone(), || async {
                let params = ProductListParams::from(&query);
                let resp: PagedResponse<Product> =
                    self.client.get_json(PRODUCTS_PATH, &params).await?;
                resp.into_page()
            })
            .await
    }

    pub async fn create_product(&self, product: &Product) -> AppResult<Product> {
        let saved = self.save(Method::POST, PRODUCTS_PATH, product).await?;
        self.cache.invalidate();
        tracing::debug!(id = ?saved.id, "product created");
        Ok(saved)
    }

    pub async fn update_product(&self, id: &EntityId, product: &Product) -> AppResult<Product> {
        let path = format!("{PRODUCTS_PATH}/{id}");
        let saved = self.save(Method::PUT, &path, product).await?;
        self.cache.invalidate();
        tracing::debug!(%id, "product updated");
        Ok(saved)
    }

    pub async fn delete_product(&self, id: &EntityId) -> AppResult<()> {
        self.client
            .send_empty(Method::DELETE, &format!("{PRODUCTS_PATH}/{id}"))
            .await?;
        self.cache.invalidate();
        tracing::debug!(%id, "product deleted");
        Ok(())
    }

    async fn save(&self, method: Method, path: &str, product: &Product) -> AppResult<Product> {
        let resp: MaybeWrapped<Product> = match ProductEncoding::for_product(product) {
            ProductEncoding::Json => self.client.send_json(method, path, product).await?,
            ProductEncoding::Multipart => {
                let form = product_multipart(product)?;
                self.client.send_multipart(method, path, form).await?
            }
        };
        Ok(resp.into_inner())
    }
}

#[async_trait]
impl CrudResource<Product> for ProductService {
    type Query = ProductQuery;

    async fn list(&self, query: &ProductQuery) -> AppResult<Page<Product>> {
        self.list_products(query).await
    }

    async fn create(&self, entity: &Product) -> AppResult<Product> {
        self.create_product(entity).await
    }

    async fn update(&self, id: &EntityId, entity: &Product) -> AppResult<Product> {
        self.update_product(id, entity).await
    }

    async fn delete(&self, id: &EntityId) -> AppResult<()> {
        self.delete_product(id).await
    }
}
