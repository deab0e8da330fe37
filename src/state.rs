use std::sync::Arc;

use crate::{
    auth::AuthGuard,
    client::ApiClient,
    config::AppConfig,
    error::AppResult,
    notify::{Notifier, Toasts},
    routes::{History, Navigator},
    screens::{ProductScreen, ReferenceData, UserScreen},
    services::{AuthService, CategoryService, ProductService, SiteService, UserService},
    session::TokenStore,
};

/// Everything a screen needs, shared by handle. Services are shared so that
/// a mutation on one screen invalidates the list every screen reads.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub client: ApiClient,
    pub guard: Arc<AuthGuard>,
    pub history: Arc<History>,
    pub toasts: Arc<Toasts>,
    pub products: Arc<ProductService>,
    pub users: Arc<UserService>,
    pub categories: Arc<CategoryService>,
    pub sites: Arc<SiteService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: AppConfig, tokens: Arc<dyn TokenStore>) -> AppResult<Self> {
        let history = Arc::new(History::default());
        let navigator: Arc<dyn Navigator> = history.clone();
        let guard = Arc::new(AuthGuard::new(tokens, navigator));
        let client = ApiClient::new(config.api_base_url.clone(), guard.clone())?;

        Ok(Self {
            products: Arc::new(ProductService::new(client.clone())),
            users: Arc::new(UserService::new(client.clone())),
            categories: Arc::new(CategoryService::categories(client.clone())),
            sites: Arc::new(SiteService::sites(client.clone())),
            auth: Arc::new(AuthService::new(client.clone())),
            config,
            client,
            guard,
            history,
            toasts: Arc::new(Toasts::new()),
        })
    }

    fn notifier(&self) -> Arc<dyn Notifier> {
        self.toasts.clone()
    }

    /// A fresh product screen with its own store.
    pub fn product_screen(&self) -> ProductScreen {
        ProductScreen::new(
            self.products.clone(),
            self.notifier(),
            self.config.product_form,
        )
    }

    pub fn user_screen(&self) -> UserScreen {
        UserScreen::new(self.users.clone(), self.notifier(), ())
    }

    pub async fn reference_data(&self) -> AppResult<ReferenceData> {
        ReferenceData::load(&self.categories, &self.sites).await
    }
}
