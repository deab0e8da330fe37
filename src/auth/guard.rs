use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    auth::menu::{MenuSection, back_office_menu},
    routes::{Navigator, Route},
    session::TokenStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// The persisted token has not been looked at yet.
    Unknown,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    /// Protected route requested before the token check ran.
    Pending,
}

/// Client-side session gate. Owns the token store so that every way of
/// leaving a session (logout, 401) clears the token and redirects alike.
pub struct AuthGuard {
    state: RwLock<AuthState>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthGuard {
    pub fn new(tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: RwLock::new(AuthState::Unknown),
            tokens,
            navigator,
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get_token()
    }

    /// Decides the session from the persisted token's presence. Runs once:
    /// later calls return the settled state.
    pub fn check(&self) -> AuthState {
        let decided = {
            let mut state = self.state.write();
            if *state != AuthState::Unknown {
                return *state;
            }
            *state = if self.tokens.get_token().is_some() {
                AuthState::Authenticated
            } else {
                AuthState::Unauthenticated
            };
            *state
        };
        tracing::debug!(state = ?decided, "session checked");
        if decided == AuthState::Unauthenticated {
            self.navigator.navigate(Route::Login);
        }
        decided
    }

    pub fn sign_in(&self, token: &str) -> std::io::Result<()> {
        self.tokens.set_token(token)?;
        *self.state.write() = AuthState::Authenticated;
        tracing::info!("signed in");
        Ok(())
    }

    pub fn sign_out(&self) {
        self.end_session();
        tracing::info!("signed out");
    }

    /// Called by the API client on a 401 from any endpoint.
    pub fn session_expired(&self) {
        tracing::warn!("unauthorized response, ending session");
        self.end_session();
    }

    fn end_session(&self) {
        if let Err(err) = self.tokens.clear_token() {
            tracing::warn!(error = %err, "token clear failed");
        }
        *self.state.write() = AuthState::Unauthenticated;
        self.navigator.navigate(Route::Login);
    }

    pub fn resolve(&self, route: Route) -> RouteDecision {
        if !route.is_protected() {
            return RouteDecision::Allow;
        }
        match self.state() {
            AuthState::Authenticated => RouteDecision::Allow,
            AuthState::Unauthenticated => RouteDecision::RedirectToLogin,
            AuthState::Unknown => RouteDecision::Pending,
        }
    }

    /// Navigates to `route`, or to the login page when the session does not
    /// allow it. Returns where the user ended up.
    pub fn visit(&self, route: Route) -> Route {
        let target = match self.resolve(route) {
            RouteDecision::Allow => route,
            RouteDecision::RedirectToLogin => Route::Login,
            RouteDecision::Pending => return self.navigator.current(),
        };
        self.navigator.navigate(target);
        target
    }

    /// The menu with protected entries hidden unless authenticated.
    pub fn visible_menu(&self) -> Vec<MenuSection> {
        let authenticated = self.is_authenticated();
        back_office_menu()
            .into_iter()
            .filter_map(|section| section.visible(authenticated))
            .collect()
    }
}
