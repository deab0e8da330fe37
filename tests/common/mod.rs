#![allow(dead_code)]

//! In-process stand-in for the back-office REST API. Every request is
//! recorded so tests can assert on exactly what went over the wire.

use std::{collections::HashMap, collections::HashSet, sync::Arc};

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Path, Query, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::Mutex;
use serde_json::{Value, json};

use backoffice_admin::{
    AppState,
    config::AppConfig,
    notify::Severity,
    session::{MemoryTokenStore, TokenStore},
};

pub const TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json request body")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let raw = self.query.clone().unwrap_or_default();
        reqwest::Url::parse(&format!("http://stub/?{raw}"))
            .expect("query parses")
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

#[derive(Default)]
pub struct StubData {
    pub requests: Vec<Recorded>,
    pub products: Vec<Value>,
    pub users: Vec<Value>,
    pub categories: Value,
    pub sites: Value,
    pub failing_deletes: HashSet<String>,
    pub fail_logout: bool,
    next_id: u64,
}

impl StubData {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn seeded() -> Self {
        let mut data = StubData {
            categories: json!([{ "id": 1, "name": "Shirts" }, { "id": 2, "name": "Hats" }]),
            sites: json!([{ "id": "main", "name": "Main store" }]),
            ..StubData::default()
        };
        for (name, price, category) in [("Blue shirt", "20.00", 1), ("Red shirt", "15.00", 1), ("Cap", "8.00", 2)] {
            let id = data.next_id();
            data.products.push(json!({
                "id": id,
                "name": name,
                "description": null,
                "price": price,
                "site_id": "main",
                "category_id": category,
                "variants": [],
                "images": [{ "image_path": format!("products/{id}.png"), "is_primary": true }],
            }));
        }
        for n in 1..=12 {
            let id = data.next_id();
            data.users.push(json!({
                "id": id,
                "first_name": format!("User{n}"),
                "last_name": "Tester",
                "email": format!("user{n}@example.com"),
                "image": null,
                "role": "client",
            }));
        }
        data
    }
}

type Shared = Arc<Mutex<StubData>>;

pub struct Stub {
    pub base_url: String,
    data: Shared,
}

impl Stub {
    pub async fn start() -> anyhow::Result<Self> {
        let data: Shared = Arc::new(Mutex::new(StubData::seeded()));

        let app = Router::new()
            .route("/api/products", get(list_products).post(create_product))
            .route("/api/products/{id}", put(update_product).delete(delete_product))
            .route("/api/back-office/categories", get(categories))
            .route("/api/back-office/sites", get(sites))
            .route("/api/back-office/users", get(list_users).post(create_user))
            .route(
                "/api/back-office/users/{id}",
                post(update_user).delete(delete_user),
            )
            .route("/api/login", post(login))
            .route("/api/logout", post(logout))
            .route("/auth/me", get(me))
            .layer(middleware::from_fn_with_state(data.clone(), record_and_authorize))
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            data,
        })
    }

    /// Application state wired to this stub with the given stored token.
    pub fn app(&self, token: Option<&str>) -> anyhow::Result<(AppState, Arc<MemoryTokenStore>)> {
        let store = Arc::new(match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        });
        let tokens: Arc<dyn TokenStore> = store.clone();
        let state = AppState::new(AppConfig::with_base_url(&self.base_url)?, tokens)?;
        state.guard.check();
        Ok((state, store))
    }

    /// Signed-in application state.
    pub fn signed_in(&self) -> anyhow::Result<AppState> {
        Ok(self.app(Some(TOKEN))?.0)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.data.lock().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn fail_delete(&self, id: &str) {
        self.data.lock().failing_deletes.insert(id.to_string());
    }

    pub fn fail_logout(&self) {
        self.data.lock().fail_logout = true;
    }

    pub fn set_sites(&self, sites: Value) {
        self.data.lock().sites = sites;
    }

    pub fn product_count(&self) -> usize {
        self.data.lock().products.len()
    }

    pub fn user_count(&self) -> usize {
        self.data.lock().users.len()
    }
}

pub fn error_toasts(state: &AppState) -> Vec<String> {
    toasts_of(state, Severity::Error)
}

pub fn success_toasts(state: &AppState) -> Vec<String> {
    toasts_of(state, Severity::Success)
}

fn toasts_of(state: &AppState, severity: Severity) -> Vec<String> {
    state
        .toasts
        .snapshot()
        .into_iter()
        .filter(|t| t.severity == severity)
        .map(|t| t.detail)
        .collect()
}

async fn record_and_authorize(State(data): State<Shared>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let header_str = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        content_type: header_str(header::CONTENT_TYPE),
        authorization: header_str(header::AUTHORIZATION),
        body: bytes.clone(),
    };
    let authorized =
        recorded.path == "/api/login" || recorded.authorization.as_deref() == Some("Bearer tok-123");
    data.lock().requests.push(recorded);

    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." })))
            .into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn price_of(product: &Value) -> f64 {
    match &product["price"] {
        Value::String(s) => s.parse().unwrap_or_default(),
        other => other.as_f64().unwrap_or_default(),
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn list_products(
    State(data): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = data.lock();
    let mut rows: Vec<Value> = data.products.clone();

    if let Some(name) = params.get("name") {
        let needle = name.to_lowercase();
        rows.retain(|p| {
            p["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        });
    }
    if let Some(category) = params.get("category_id") {
        rows.retain(|p| &id_string(&p["category_id"]) == category);
    }
    match params.get("sort_by").map(String::as_str) {
        Some("name") => rows.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str())),
        Some("price") => rows.sort_by(|a, b| price_of(a).total_cmp(&price_of(b))),
        _ => {}
    }
    if params.get("sort_order").map(String::as_str) != Some("asc") {
        rows.reverse();
    }

    let per_page: usize = params
        .get("per_page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let page: usize = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let total = rows.len();
    let items: Vec<Value> = rows
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Json(json!({
        "success": true,
        "data": items,
        "pagination": {
            "totalItems": total,
            "currentPage": page,
            "totalPages": total.div_ceil(per_page),
            "limit": per_page,
        }
    }))
    .into_response()
}

/// Pulls one text field out of a multipart body.
fn multipart_text(body: &str, field: &str) -> Option<String> {
    let marker = format!("name=\"{field}\"\r\n\r\n");
    let start = body.find(&marker)? + marker.len();
    let end = body[start..].find("\r\n")? + start;
    Some(body[start..end].to_string())
}

fn decode_product(headers: &HeaderMap, body: &Bytes) -> Value {
    let multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if multipart {
        let text = String::from_utf8_lossy(body);
        json!({
            "name": multipart_text(&text, "name"),
            "description": multipart_text(&text, "description"),
            "price": multipart_text(&text, "price"),
            "variants": [],
            "images": [],
        })
    } else {
        serde_json::from_slice(body).unwrap_or(Value::Null)
    }
}

async fn create_product(State(data): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let mut product = decode_product(&headers, &body);
    let mut data = data.lock();
    product["id"] = json!(data.next_id());
    data.products.push(product.clone());
    (StatusCode::CREATED, Json(json!({ "data": product }))).into_response()
}

async fn update_product(
    State(data): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut product = decode_product(&headers, &body);
    let mut data = data.lock();
    let Some(slot) = data.products.iter_mut().find(|p| id_string(&p["id"]) == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Product not found" }))).into_response();
    };
    product["id"] = slot["id"].clone();
    *slot = product.clone();
    Json(product).into_response()
}

async fn delete_product(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    let mut data = data.lock();
    if data.failing_deletes.contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "delete failed" })),
        )
            .into_response();
    }
    data.products.retain(|p| id_string(&p["id"]) != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn categories(State(data): State<Shared>) -> Response {
    Json(data.lock().categories.clone()).into_response()
}

async fn sites(State(data): State<Shared>) -> Response {
    Json(data.lock().sites.clone()).into_response()
}

async fn list_users(State(data): State<Shared>) -> Response {
    Json(json!({ "data": data.lock().users.clone() })).into_response()
}

async fn create_user(State(data): State<Shared>, Json(mut user): Json<Value>) -> Response {
    let mut data = data.lock();
    user["id"] = json!(data.next_id());
    if let Some(obj) = user.as_object_mut() {
        obj.remove("password");
    }
    data.users.push(user.clone());
    (StatusCode::CREATED, Json(json!({ "data": user }))).into_response()
}

async fn update_user(
    State(data): State<Shared>,
    Path(id): Path<String>,
    Json(mut user): Json<Value>,
) -> Response {
    let mut data = data.lock();
    let Some(slot) = data.users.iter_mut().find(|u| id_string(&u["id"]) == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))).into_response();
    };
    user["id"] = slot["id"].clone();
    if let Some(obj) = user.as_object_mut() {
        obj.remove("password");
    }
    *slot = user.clone();
    Json(json!({ "data": user })).into_response()
}

async fn delete_user(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    let mut data = data.lock();
    if data.failing_deletes.contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "delete failed" })),
        )
            .into_response();
    }
    data.users.retain(|u| id_string(&u["id"]) != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({
        "token": TOKEN,
        "user": { "id": 1, "email": body["email"], "role": "admin" },
    }))
    .into_response()
}

async fn logout(State(data): State<Shared>) -> Response {
    if data.lock().fail_logout {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({ "message": "Logged out" })).into_response()
}

async fn me() -> Response {
    Json(json!({ "data": { "id": 1, "email": "admin@example.com", "role": "admin" } }))
        .into_response()
}
