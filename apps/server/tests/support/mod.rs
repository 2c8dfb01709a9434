#![allow(dead_code)]

pub mod assertions;
pub mod backends;
pub mod fixtures;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use catalog_gateway::{
    api::{create_app, App},
    backend::SearchBackend,
    config::Credential,
    AppState, Config,
};
use std::sync::Arc;
use tower::ServiceExt as _;

// Re-export commonly used items
pub use assertions::*;
pub use backends::*;
pub use fixtures::*;

pub const TEST_USER: &str = "tester";
pub const TEST_PASSWORD: &str = "s3cret";

pub struct TestApp {
    pub app: App,
    pub state: AppState,
}

impl TestApp {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::new_with_config(backend, |_| {})
    }

    pub fn new_with_config(
        backend: Arc<dyn SearchBackend>,
        configure: impl FnOnce(&mut Config),
    ) -> Self {
        init_tracing();

        let mut config = Config::default();
        config.auth.credentials = vec![Credential {
            username: TEST_USER.to_string(),
            password: TEST_PASSWORD.to_string(),
        }];
        configure(&mut config);

        let state = AppState::new(config, backend);
        let app = create_app(state.clone());
        Self { app, state }
    }

    /// GET with the test user's credentials.
    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let auth = basic_auth(TEST_USER, TEST_PASSWORD);
        self.request_with_extra_headers(Method::GET, path_and_query, &[("authorization", auth.as_str())])
            .await
    }

    /// GET without any credentials.
    pub async fn get_anonymous(
        &self,
        path_and_query: &str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(Method::GET, path_and_query, &[])
            .await
    }

    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let (status, _headers, body) = self.get(path_and_query).await?;
        let value = serde_json::from_slice(&body)
            .with_context(|| format!("response body is JSON: {}", String::from_utf8_lossy(&body)))?;
        Ok((status, value))
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .body(Body::empty())
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }
}

pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

fn init_tracing() {
    use std::sync::OnceLock;
    use tracing_subscriber::prelude::*;
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "catalog_gateway=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
