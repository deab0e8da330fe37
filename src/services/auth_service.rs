use reqwest::Method;

use crate::{
    client::ApiClient,
    dto::auth::{LoginRequest, LoginResponse, SessionUser},
    error::AppResult,
    response::MaybeWrapped,
};

pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token and opens the session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Option<SessionUser>> {
        let resp: LoginResponse = self
            .client
            .send_json(Method::POST, "/api/login", &LoginRequest { email, password })
            .await?;
        self.client.guard().sign_in(&resp.token)?;
        tracing::info!(email = %email, "login succeeded");
        Ok(resp.user)
    }

    /// Tells the server, then drops the local session whatever it answered.
    pub async fn logout(&self) -> AppResult<()> {
        let result = self.client.send_empty(Method::POST, "/api/logout").await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "logout request failed");
        }
        self.client.guard().sign_out();
        result
    }

    /// Only asks the server when a token is stored.
    pub async fn current_user(&self) -> AppResult<Option<SessionUser>> {
        if self.client.guard().token().is_none() {
            return Ok(None);
        }
        let resp: MaybeWrapped<SessionUser> = self.client.get("/auth/me").await?;
        Ok(Some(resp.into_inner()))
    }
}
