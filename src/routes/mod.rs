use parking_lot::RwLock;

pub mod params;

/// Entry points of the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Users,
    Categories,
    Products,
    Landing,
    Login,
    Error,
    AccessDenied,
    NotFound,
}

impl Route {
    pub const LOGIN_PATH: &'static str = "/auth/login";

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Users => "/pages/user",
            Route::Categories => "/pages/category",
            Route::Products => "/pages/product",
            Route::Landing => "/landing",
            Route::Login => Self::LOGIN_PATH,
            Route::Error => "/auth/error",
            Route::AccessDenied => "/auth/access",
            Route::NotFound => "/pages/notfound",
        }
    }

    pub fn from_path(path: &str) -> Route {
        let path = path.trim_end_matches('/');
        match path {
            "" => Route::Dashboard,
            "/pages/user" => Route::Users,
            "/pages/category" => Route::Categories,
            "/pages/product" => Route::Products,
            "/landing" => Route::Landing,
            "/auth/login" => Route::Login,
            "/auth/error" => Route::Error,
            "/auth/access" => Route::AccessDenied,
            _ => Route::NotFound,
        }
    }

    /// Routes that need a session. The auth pages and the public landing do not.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Users | Route::Categories | Route::Products
        )
    }
}

/// Moves the user between routes. Redirects from the auth guard and the
/// 401 interceptor go through here.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn current(&self) -> Route;
}

/// Navigator that only records where the user was sent.
#[derive(Debug)]
pub struct History {
    visited: RwLock<Vec<Route>>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            visited: RwLock::new(vec![start]),
        }
    }

    pub fn visited(&self) -> Vec<Route> {
        self.visited.read().clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        let mut visited = self.visited.write();
        if visited.last() != Some(&route) {
            tracing::debug!(path = route.path(), "navigate");
            visited.push(route);
        }
    }

    fn current(&self) -> Route {
        self.visited
            .read()
            .last()
            .copied()
            .unwrap_or(Route::Dashboard)
    }
}
