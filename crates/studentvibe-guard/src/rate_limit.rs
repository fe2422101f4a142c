//! Sliding-window rate limiting for Guard
//!
//! Every limiter implements [`RateLimiter`]. Which one runs is decided once
//! at startup by [`build_limiter`]:
//!
//! - [`NoopLimiter`] when no store is configured (admits everything)
//! - [`MemorySlidingWindow`] for a single process
//! - [`RedisSlidingWindow`](crate::redis_store::RedisSlidingWindow) for a
//!   store shared by every instance

use crate::config::{RateLimitBackend, RateLimitConfig, MAX_WINDOW_SECS};
use crate::error::Result;
use crate::types::{Admission, RateLimitStatus};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Admission control keyed by client identity
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an attempt for `client_id` and decide whether it is admitted.
    ///
    /// Denied attempts do not consume quota. Implementations must be atomic
    /// per client: concurrent admits never over-admit.
    async fn admit(&self, client_id: &str) -> Result<Admission>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Limiter used when no counter store is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLimiter;

#[async_trait]
impl RateLimiter for NoopLimiter {
    async fn admit(&self, _client_id: &str) -> Result<Admission> {
        Ok(Admission::Allowed(None))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// In-process sliding-window log.
///
/// Each client keeps the timestamps of its admitted requests. The dashmap
/// entry guard holds the shard lock for the whole check-and-record, which
/// serializes admits for the same client.
///
/// Client ids come from a request header, so expired clients are swept from
/// the admit path at most once per window; the map only holds clients seen
/// in roughly the last two windows.
pub struct MemorySlidingWindow {
    max_requests: u32,
    window: Duration,
    entries: DashMap<String, VecDeque<DateTime<Utc>>>,
    last_sweep_ms: AtomicI64,
}

impl MemorySlidingWindow {
    /// Create a limiter from configuration
    pub fn new(config: &RateLimitConfig) -> Self {
        let window_secs = config.window_secs.clamp(1, MAX_WINDOW_SECS);
        Self {
            max_requests: config.max_requests,
            window: Duration::seconds(window_secs as i64),
            entries: DashMap::new(),
            last_sweep_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    /// Admission check at an explicit instant
    pub fn admit_at(&self, client_id: &str, now: DateTime<Utc>) -> Admission {
        // Must run before the entry guard is taken; retain locks every shard
        self.maybe_sweep(now);

        let mut log = self.entries.entry(client_id.to_string()).or_default();

        let cutoff = now - self.window;
        while log.front().is_some_and(|t| *t <= cutoff) {
            log.pop_front();
        }

        let used = log.len() as u32;
        if used < self.max_requests {
            log.push_back(now);
            let oldest = log.front().copied().unwrap_or(now);
            Admission::Allowed(Some(RateLimitStatus {
                limit: self.max_requests,
                remaining: self.max_requests - used - 1,
                reset_at: oldest + self.window,
            }))
        } else {
            let oldest = log.front().copied().unwrap_or(now);
            Admission::Denied(RateLimitStatus {
                limit: self.max_requests,
                remaining: 0,
                reset_at: oldest + self.window,
            })
        }
    }

    fn maybe_sweep(&self, now: DateTime<Utc>) {
        let now_ms = now.timestamp_millis();
        let last = self.last_sweep_ms.load(Ordering::Relaxed);
        if now_ms - last < self.window.num_milliseconds() {
            return;
        }
        // One caller wins the sweep; the rest carry on
        if self
            .last_sweep_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.cleanup(now);
        }
    }

    /// Drop clients whose whole log has expired
    pub fn cleanup(&self, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        self.entries
            .retain(|_, log| log.back().is_some_and(|t| *t > cutoff));
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl RateLimiter for MemorySlidingWindow {
    async fn admit(&self, client_id: &str) -> Result<Admission> {
        Ok(self.admit_at(client_id, Utc::now()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Build the limiter selected by `config.backend`
pub async fn build_limiter(config: &RateLimitConfig) -> Result<Arc<dyn RateLimiter>> {
    config.validate()?;

    match config.backend {
        RateLimitBackend::None => Ok(Arc::new(NoopLimiter)),
        RateLimitBackend::Memory => Ok(Arc::new(MemorySlidingWindow::new(config))),
        #[cfg(feature = "redis-store")]
        RateLimitBackend::Redis => {
            let limiter = crate::redis_store::RedisSlidingWindow::connect(config).await?;
            Ok(Arc::new(limiter))
        }
        #[cfg(not(feature = "redis-store"))]
        RateLimitBackend::Redis => Err(crate::error::GuardError::ConfigError(
            "redis backend requires the `redis-store` feature".to_string(),
        )),
    }
}
