//! Fixed-window per-client rate limiting

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tracing::warn;

use super::state::AppState;
use crate::constants::server::RATE_LIMIT_SWEEP_THRESHOLD;
use crate::types::RefineError;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Counts requests per key within fixed windows
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<String, Window>,
    sweep_threshold: usize,
    last_sweep: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
            sweep_threshold: RATE_LIMIT_SWEEP_THRESHOLD,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Record one request for `key`; `false` once the window is exhausted.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        // Must run before taking an entry guard; at most one sweep per window
        if self.windows.len() > self.sweep_threshold
            && let Ok(mut last) = self.last_sweep.try_lock()
            && now.duration_since(*last) >= self.window
        {
            *last = now;
            self.sweep(now);
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return false;
        }
        entry.count += 1;
        true
    }

    /// Drop expired windows
    fn sweep(&self, now: Instant) {
        let window = self.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Middleware rejecting clients over their per-window budget with 429
pub async fn limit_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_key(&request);

    if !state.limiter.check(&client) {
        warn!(%client, "Rate limit exceeded");
        return state.error(RefineError::RateLimited).into_response();
    }

    next.run(request).await
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
