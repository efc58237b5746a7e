use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::ApiError;
use super::rate_limit::RateLimiter;
use crate::ai::SharedProvider;
use crate::config::Config;
use crate::constants::server::RATE_LIMIT_WINDOW_SECS;
use crate::refactor::RefactorService;
use crate::types::RefineError;

/// Shared handler state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub service: RefactorService,
    pub config: Arc<Config>,
    pub limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, provider: SharedProvider) -> Self {
        let limiter = RateLimiter::new(
            config.server.rate_limit_per_minute,
            Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
        );

        Self {
            service: RefactorService::new(provider),
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            started_at: Instant::now(),
        }
    }

    /// Envelope for `err`, honouring the diagnostics setting
    pub fn error(&self, err: RefineError) -> ApiError {
        ApiError::from_error(&err, self.config.server.diagnostics)
    }
}
