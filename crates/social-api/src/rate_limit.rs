//! Sliding-window request counter keyed by client address.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

pub const RATE_WINDOW: Duration = Duration::from_millis(1000);
pub const RATE_MAX_HITS: usize = 20;

/// In-memory only; resets on restart and is keyed purely by peer address.
pub struct RateLimiter {
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
    window: Duration,
    max_hits: usize,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_WINDOW, RATE_MAX_HITS)
    }
}

impl RateLimiter {
    pub fn new(window: Duration, max_hits: usize) -> Self {
        Self {
            hits: Mutex::new(HashMap::new()),
            window,
            max_hits,
        }
    }

    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Record a hit for `key` at `now` and report whether it is admitted.
    /// Rejected hits are recorded too, so hammering keeps the window full.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        // A poisoned map still holds valid timestamps.
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        let stamps = hits.entry(key.to_string()).or_default();

        stamps.retain(|ts| now.saturating_duration_since(*ts) < self.window);
        stamps.push_back(now);

        stamps.len() <= self.max_hits
    }

    /// Number of distinct clients seen since startup.
    pub fn tracked_clients(&self) -> usize {
        self.hits.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_key(&request);

    if state.limiter.check(&key) {
        next.run(request).await
    } else {
        warn!(client = %key, "Rate limit exceeded");
        ApiError::TooManyRequests.into_response()
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
