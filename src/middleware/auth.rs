use reqwest::{RequestBuilder, Response, StatusCode, header};

use crate::{
    auth::AuthGuard,
    error::{AppError, AppResult},
    response::ErrorBody,
};

/// Formats a stored token as an `Authorization` value. Some login endpoints
/// already hand out `Bearer <jwt>`; those are passed through unchanged.
pub fn bearer_value(token: &str) -> String {
    let token = token.trim();
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

/// Request side: adds the bearer header when a token is present.
pub fn attach_bearer(builder: RequestBuilder, guard: &AuthGuard) -> RequestBuilder {
    match guard.token() {
        Some(token) => builder.header(header::AUTHORIZATION, bearer_value(&token)),
        None => builder,
    }
}

/// Response side: a 401 ends the session wherever it came from; any other
/// error status becomes a request failure carrying the server's message.
pub async fn intercept(response: Response, guard: &AuthGuard) -> AppResult<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        guard.session_expired();
        return Err(AppError::SessionExpired);
    }
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Operation failed")
                    .to_string()
            });
        return Err(AppError::Status { status, message });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_not_doubled() {
        assert_eq!(bearer_value("abc"), "Bearer abc");
        assert_eq!(bearer_value("Bearer abc"), "Bearer abc");
    }
}
