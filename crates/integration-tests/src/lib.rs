//! Integration tests for Threadline.
//!
//! Requests are driven through the real storefront router with
//! `tower::ServiceExt::oneshot`, so no listener or network is involved.
//! [`TestApp`] plays the browser: it keeps the session cookie between calls.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use threadline_core::cart::SessionState;
use threadline_storefront::{
    app,
    catalog::Catalog,
    config::StorefrontConfig,
    htmx::HX_REQUEST,
    middleware::SESSION_COOKIE_NAME,
    state::AppState,
};
use tower::ServiceExt;

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One visitor talking to a fresh storefront.
///
/// Clones share the storefront and the session cookie, like browser tabs.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Build the storefront with the bundled catalog.
    ///
    /// # Panics
    ///
    /// Panics if the bundled catalog does not load.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let config = StorefrontConfig {
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
            ..StorefrontConfig::default()
        };
        let catalog = Catalog::bundled().expect("bundled catalog loads");

        Self {
            router: app(AppState::new(config, catalog)),
            cookie: None,
        }
    }

    /// A second visitor sharing this storefront (and its session store).
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Whether the storefront has issued this visitor a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// `GET` a path.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request).await
    }

    /// `POST` a form the way a plain browser would.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()));
        self.send(request).await
    }

    /// `POST` a form the way HTMX would.
    pub async fn htmx_post(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(HX_REQUEST, "true")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()));
        self.send(request).await
    }

    /// The visitor's session as reported by `/api/session`.
    ///
    /// # Panics
    ///
    /// Panics if the endpoint fails or returns malformed JSON.
    #[allow(clippy::expect_used)]
    pub async fn session_state(&mut self) -> SessionState {
        let response = self.get("/api/session").await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        serde_json::from_str(&response.body).expect("session JSON")
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    #[allow(clippy::expect_used)]
    async fn send(
        &mut self,
        request: Result<Request<Body>, axum::http::Error>,
    ) -> TestResponse {
        let request = request.expect("valid request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();

        if let Some(cookie) = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(SESSION_COOKIE_NAME))
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_owned());
        }

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
