use serde::{Deserialize, Serialize};

use crate::models::{EntityId, Role};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// The account behind a session, as `/api/login` and `/auth/me` describe it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionUser {
    pub id: EntityId,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<SessionUser>,
}
