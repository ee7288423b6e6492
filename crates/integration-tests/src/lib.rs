//! Integration tests for ShopEase.
//!
//! The storefront router is driven in-process with
//! [`tower::ServiceExt::oneshot`]. [`TestClient`] carries the session
//! cookie between requests the way a browser tab would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopease-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, BodyDataStream, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use shopease_storefront::app;
use shopease_storefront::config::StorefrontConfig;
use shopease_storefront::state::AppState;
use tower::ServiceExt;

/// Largest response body read by tests.
const BODY_LIMIT: usize = 1024 * 1024;

/// A response with its body collected as text.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a header as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One browser tab: a router plus the session cookie it has been given.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Client against a fresh storefront with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::new(StorefrontConfig::default()))
    }

    /// Client against a storefront built from `state`.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            app: app(state),
            cookie: None,
        }
    }

    /// A second tab in the same browsing session.
    #[must_use]
    pub fn new_tab(&self) -> Self {
        self.clone()
    }

    /// Session cookie (`name=value`), once one was issued.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self
            .request("GET", path)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a URL-encoded form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    /// Open a streaming GET, such as server-sent events.
    ///
    /// Returns the status and the body as it arrives.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn open_stream(&mut self, path: &str) -> (StatusCode, BodyDataStream) {
        let request = self
            .request("GET", path)
            .body(Body::empty())
            .expect("valid request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        (response.status(), response.into_body().into_data_stream())
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let issued = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string());
        if issued.is_some() {
            self.cookie = issued;
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("readable body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields of a checkout form that passes validation.
#[must_use]
pub fn valid_checkout() -> Vec<(&'static str, &'static str)> {
    vec![
        ("full_name", "Maria Santos"),
        ("email", "maria@example.ph"),
        ("address", "45 Mabini Ave"),
        ("city", "Makati"),
        ("postal_code", "1200"),
        ("card", "4242 4242 4242 4242"),
        ("expiry", "08/30"),
        ("cvv", "321"),
    ]
}
