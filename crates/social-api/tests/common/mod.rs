#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use social_api::rate_limit::RateLimiter;
use social_api::routes;
use social_api::state::{AppState, AppStateInner};
use social_db::Database;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&self.body))
        })
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_string()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<String> {
        self.headers
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    }
}

impl TestApp {
    /// App whose limiter never trips, so suites can fire freely.
    pub fn new() -> Self {
        Self::with_limiter(RateLimiter::new(Duration::from_secs(1), 100_000))
    }

    pub fn with_limiter(limiter: RateLimiter) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let uploads_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads_dir).unwrap();

        let db = Database::open(&dir.path().join("social.db"), 4).unwrap();
        let state: AppState = Arc::new(AppStateInner {
            db: Arc::new(db),
            jwt_secret: SECRET.to_string(),
            admin_uploads_dir: uploads_dir.join("admin"),
            uploads_dir,
            limiter,
        });
        let router = routes::router(state.clone());

        Self { dir, state, router }
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn uploads(&self) -> PathBuf {
        self.state.uploads_dir.clone()
    }

    pub fn user(&self, email: &str, password: &str) -> i64 {
        self.db().create_user(email, password, "Test User", "user").unwrap()
    }

    pub fn admin(&self, email: &str, password: &str) -> i64 {
        self.db().create_user(email, password, "Test Admin", "admin").unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse { status, headers, body }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        self.send(build(method, uri, cookie, body)).await
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.call(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.call(Method::POST, uri, Some(cookie), Some(body)).await
    }

    pub async fn put(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.call(Method::PUT, uri, Some(cookie), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> TestResponse {
        self.call(Method::DELETE, uri, Some(cookie), None).await
    }

    /// Log in and return a `Cookie` header value carrying the session.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let res = self
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {:?}", res.json());
        session_cookie(&res).expect("login sets a session cookie")
    }
}

pub fn build(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn from_peer(mut request: Request<Body>, addr: &str) -> Request<Body> {
    let addr: SocketAddr = addr.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

/// `token=<jwt>` from the response's `Set-Cookie`, if any.
pub fn session_cookie(res: &TestResponse) -> Option<String> {
    res.headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Percent-encode everything outside the unreserved set.
pub fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
