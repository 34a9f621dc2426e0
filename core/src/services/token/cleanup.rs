//! Token cleanup service for periodic removal of expired refresh tokens
//!
//! The sweep runs as one cancellable background task. It never propagates
//! failures: a failed run is logged and the next tick simply tries again.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use h2h_shared::config::AuthConfig;

use crate::domain::entities::token::TokenStats;
use crate::repositories::RefreshTokenRepository;

use super::service::TokenService;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// Time between two sweeps; the first sweep happens one interval after start
    pub interval: Duration,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
        }
    }
}

impl TokenCleanupConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.cleanup_interval_seconds),
        }
    }
}

/// Service sweeping expired refresh tokens on a fixed interval
pub struct TokenCleanupService<R: RefreshTokenRepository + 'static> {
    tokens: Arc<TokenService<R>>,
    config: TokenCleanupConfig,
    cancel: CancellationToken,
    running: AtomicBool,
    completed_runs: AtomicU64,
}

impl<R: RefreshTokenRepository + 'static> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(tokens: Arc<TokenService<R>>, config: TokenCleanupConfig) -> Self {
        Self {
            tokens,
            config,
            cancel: CancellationToken::new(),
            running: AtomicBool::new(false),
            completed_runs: AtomicU64::new(0),
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Deletes expired refresh tokens, then collects token statistics.
    /// Errors are recorded in the result instead of being returned.
    pub async fn run_cleanup(&self) -> CleanupResult {
        let mut result = CleanupResult::default();

        match self.tokens.cleanup_expired().await {
            Ok(count) => result.expired_tokens_deleted = count,
            Err(e) => {
                error!(error = %e, "Failed to delete expired refresh tokens");
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        match self.tokens.stats().await {
            Ok(stats) => result.stats = Some(stats),
            Err(e) => {
                error!(error = %e, "Failed to collect token statistics");
                result.errors.push(format!("Token stats error: {}", e));
            }
        }

        if let Some(stats) = result.stats {
            info!(
                deleted = result.expired_tokens_deleted,
                active = stats.active_refresh_tokens,
                revoked = stats.revoked_refresh_tokens,
                expired = stats.expired_refresh_tokens,
                revoked_access = stats.revoked_access_tokens,
                "Token cleanup completed"
            );
        }

        self.completed_runs.fetch_add(1, Ordering::SeqCst);
        result
    }

    /// Start the sweep as a background task
    ///
    /// Returns `None` without spawning anything when the sweep is already
    /// running or has been stopped.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.cancel.is_cancelled() {
            warn!("Token cleanup was stopped and cannot be restarted");
            return None;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Token cleanup is already scheduled");
            return None;
        }

        let service = Arc::clone(self);
        let period = self.config.interval;
        info!(interval_secs = period.as_secs(), "Token cleanup scheduled");

        Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = service.cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let result = service.run_cleanup().await;
                        if !result.is_success() {
                            warn!(errors = ?result.errors, "Cleanup completed with errors");
                        }
                    }
                }
            }

            service.running.store(false, Ordering::SeqCst);
            info!("Token cleanup stopped");
        }))
    }

    /// Cancel the background task; an in-flight sweep finishes first
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of sweeps finished since creation
    pub fn completed_runs(&self) -> u64 {
        self.completed_runs.load(Ordering::SeqCst)
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: usize,
    /// Token statistics after the deletion
    pub stats: Option<TokenStats>,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
