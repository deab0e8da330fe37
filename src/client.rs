use std::{sync::Arc, time::Instant};

use reqwest::{
    Method, RequestBuilder, Response, Url,
    header::{ACCEPT, HeaderMap, HeaderValue},
    multipart::Form,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    auth::AuthGuard,
    error::{AppError, AppResult},
    middleware::auth::{attach_bearer, intercept},
};

/// Outbound HTTP for every service: base URL, JSON bodies, bearer injection
/// and the 401 interceptor. No timeout or retry is configured.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    guard: Arc<AuthGuard>,
}

impl ApiClient {
    pub fn new(base_url: Url, guard: Arc<AuthGuard>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url,
            guard,
        })
    }

    pub fn guard(&self) -> &Arc<AuthGuard> {
        &self.guard
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base has.
    pub fn url(&self, path: &str) -> AppResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| AppError::Config(format!("bad request path `{path}`: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let url = self.url(path)?;
        Ok(attach_bearer(self.http.request(method, url), &self.guard))
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> AppResult<Response> {
        let started = Instant::now();
        tracing::debug!(method = %method, path = %path, "request started");
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(error = %err, method = %method, path = %path, "request failed");
            AppError::Http(err)
        })?;
        tracing::info!(
            method = %method,
            path = %path,
            status = %response.status(),
            ms = %started.elapsed().as_millis(),
            "request finished"
        );
        intercept(response, &self.guard).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body)
            .map_err(|e| AppError::RequestFailure(format!("unexpected response body: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let builder = self.request(Method::GET, path)?;
        let response = self.send(Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(method.clone(), path)?.json(body);
        let response = self.send(method, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn send_multipart<T>(&self, method: Method, path: &str, form: Form) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path)?.multipart(form);
        let response = self.send(method, path, builder).await?;
        Self::decode(response).await
    }

    /// For endpoints whose success body carries nothing of interest.
    pub async fn send_empty(&self, method: Method, path: &str) -> AppResult<()> {
        let builder = self.request(method.clone(), path)?;
        self.send(method, path, builder).await?;
        Ok(())
    }
}
