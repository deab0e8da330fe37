mod common;

use axum::http::Method;
use backoffice_admin::{
    AppError,
    auth::AuthState,
    models::Role,
    routes::{Navigator, Route},
    session::TokenStore,
};

use common::{PASSWORD, Stub, TOKEN, error_toasts};

#[tokio::test]
async fn login_stores_token_and_opens_protected_routes() -> anyhow::Result<()> {
    let stub = Stub::start().await?;
    let (state, tokens) = stub.app(None)?;

    assert_eq!(state.guard.state(), AuthState::Unauthenticated);
    assert_eq!(state.history.current(), Route::Login);
    assert_eq!(state.guard.visit(Route::Products), Route::Login);

    let user = state
        .auth
        .login("admin@example.com", PASSWORD)
        .await?
        .expect("login returns the account");
    assert_eq!(user.role, Some(Role::Admin));
    assert_eq!(tokens.get_token().as_deref(), Some(TOKEN));
    assert_eq!(state.guard.state(), AuthState::Authenticated);
    assert_eq!(state.guard.visit(Route::Products), Route::Products);

    state.product_screen().refresh().await?;
    let list = stub.requests_to(Method::GET, "/api/products");
    assert_eq!(list[0].authorization.as_deref(), Some("Bearer tok-123"));
    Ok(())
}

#[tokio::test]
async fn bad_credentials_leave_the_session_closed() -> anyhow::Result<()> {
    let stub = Stub::start().await?;
    let (state, tokens) = stub.app(None)?;

    let err = state
        .auth
        .login("admin@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Status { ref message, .. } if message == "Invalid credentials"));
    assert_eq!(tokens.get_token(), None);
    assert_eq!(state.guard.state(), AuthState::Unauthenticated);
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_ends_the_session() -> anyhow::Result<()> {
    let stub = Stub::start().await?;
    let (state, tokens) = stub.app(Some("stale"))?;
    assert_eq!(state.guard.state(), AuthState::Authenticated);

    let mut screen = state.product_screen();
    let err = screen.refresh().await.unwrap_err();

    assert!(matches!(err, AppError::SessionExpired));
    assert_eq!(tokens.get_token(), None);
    assert_eq!(state.guard.state(), AuthState::Unauthenticated);
    assert_eq!(state.history.current(), Route::Login);
    assert!(!screen.store().loading);
    assert_eq!(
        error_toasts(&state),
        vec!["Session expired, please sign in again"]
    );
    Ok(())
}

#[tokio::test]
async fn stored_token_is_sent_verbatim_when_already_prefixed() -> anyhow::Result<()> {
    let stub = Stub::start().await?;
    let (state, _) = stub.app(Some("Bearer tok-123"))?;

    state.users.list_users().await?;
    let sent = stub.requests_to(Method::GET, "/api/back-office/users");
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer tok-123"));
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_token_even_when_the_server_fails() -> anyhow::Result<()> {
    let stub = Stub::start().await?;
    stub.fail_logout();
    let (state, tokens) = stub.app(Some(TOKEN))?;

    assert!(state.auth.logout().await.is_err());
    assert_eq!(tokens.get_token(), None);
    assert_eq!(state.guard.state(), AuthState::Unauthenticated);
    assert_eq!(state.history.current(), Route::Login);
    assert_eq!(stub.requests_to(Method::POST, "/api/logout").len(), 1);
    Ok(())
}

#[tokio::test]
async fn current_user_needs_a_token() -> anyhow::Result<()> {
    let stub = Stub::start().await?;

    let (anonymous, _) = stub.app(None)?;
    assert_eq!(anonymous.auth.current_user().await?, None);
    assert!(stub.requests().is_empty());

    let state = stub.signed_in()?;
    let me = state.auth.current_user().await?.expect("signed in");
    assert_eq!(me.email, "admin@example.com");
    Ok(())
}

#[tokio::test]
async fn menu_hides_protected_entries_until_signed_in() -> anyhow::Result<()> {
    let stub = Stub::start().await?;
    let (state, _) = stub.app(None)?;

    let routes = |state: &backoffice_admin::AppState| {
        let mut found = Vec::new();
        for section in state.guard.visible_menu() {
            let mut stack: Vec<_> = section.items;
            while let Some(item) = stack.pop() {
                found.extend(item.route);
                stack.extend(item.items);
            }
        }
        found
    };

    let anonymous = routes(&state);
    assert!(anonymous.contains(&Route::Login));
    assert!(anonymous.iter().all(|r| !r.is_protected()));

    state.auth.login("admin@example.com", PASSWORD).await?;
    let signed_in = routes(&state);
    for route in [Route::Dashboard, Route::Users, Route::Categories, Route::Products] {
        assert!(signed_in.contains(&route), "{route:?} missing");
    }
    Ok(())
}
