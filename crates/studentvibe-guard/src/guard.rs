//! Main Guard implementation

use crate::audit::AuditLogger;
use crate::config::GuardConfig;
use crate::error::Result;
use crate::pii::PiiScanner;
use crate::rate_limit::{build_limiter, NoopLimiter, RateLimiter};
use crate::types::{Admission, ClientContext, ScreenOutcome};
use std::sync::Arc;
use std::time::Instant;

/// Warning shown when the scanner flags a request
pub const PII_WARNING: &str = "Your text appears to contain personal information \
(an email address or phone number). Re-submit with acknowledgeSensitiveContent \
set to true to send it anyway.";

/// Screens requests before anything leaves the process.
///
/// Order is fixed: the PII check runs first so that a warning never spends
/// quota, then the rate limiter.
pub struct Guard {
    config: GuardConfig,
    pii_scanner: PiiScanner,
    rate_limiter: Arc<dyn RateLimiter>,
    audit_logger: AuditLogger,
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl Guard {
    /// Create a Guard without a counter store. Every request is admitted
    /// until a limiter is attached with [`Guard::with_rate_limiter`].
    pub fn new(config: GuardConfig) -> Self {
        Self {
            pii_scanner: PiiScanner::new(config.pii.clone()),
            rate_limiter: Arc::new(NoopLimiter),
            audit_logger: AuditLogger::new(config.audit.clone()),
            config,
        }
    }

    /// Create a Guard and connect the configured counter store
    pub async fn connect(config: GuardConfig) -> Result<Self> {
        let limiter = build_limiter(&config.rate_limit).await?;
        Ok(Self::new(config).with_rate_limiter(limiter))
    }

    /// Replace the rate limiter
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    /// Screen a request.
    ///
    /// Returns [`ScreenOutcome::Warned`] when the text looks like it carries
    /// PII and `acknowledged` is false, [`ScreenOutcome::Denied`] when the
    /// client is over quota, and [`ScreenOutcome::Cleared`] otherwise. An
    /// `Err` means the counter store itself failed.
    pub async fn screen(
        &self,
        text: &str,
        acknowledged: bool,
        context: &ClientContext,
    ) -> Result<ScreenOutcome> {
        let start = Instant::now();

        if !acknowledged {
            let kinds = self.pii_scanner.detect(text);
            if !kinds.is_empty() {
                let outcome = ScreenOutcome::Warned {
                    reason: PII_WARNING.to_string(),
                    kinds,
                };
                self.audit(context, text, &outcome, start);
                return Ok(outcome);
            }
        }

        let outcome = match self.rate_limiter.admit(&context.client_id).await? {
            Admission::Allowed(status) => ScreenOutcome::Cleared(status),
            Admission::Denied(status) => ScreenOutcome::Denied(status),
        };

        self.audit(context, text, &outcome, start);
        Ok(outcome)
    }

    /// Quick check whether text would trigger a PII warning
    pub fn contains_pii(&self, text: &str) -> bool {
        self.pii_scanner.scan(text)
    }

    /// Name of the active rate-limit backend
    pub fn rate_limiter_name(&self) -> &'static str {
        self.rate_limiter.name()
    }

    /// Configuration this Guard was built from
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    fn audit(&self, context: &ClientContext, text: &str, outcome: &ScreenOutcome, start: Instant) {
        self.audit_logger
            .log(context, text, outcome, start.elapsed().as_millis() as u64);
    }

    /// Create a builder for Guard
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }
}

/// Builder for Guard configuration
pub struct GuardBuilder {
    config: GuardConfig,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl GuardBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: GuardConfig::default(),
            rate_limiter: None,
        }
    }

    /// PII warnings only
    pub fn minimal(mut self) -> Self {
        self.config = GuardConfig::minimal();
        self
    }

    /// Configure PII detection
    pub fn with_pii(mut self, config: crate::config::PiiConfig) -> Self {
        self.config.pii = config;
        self
    }

    /// Configure audit logging
    pub fn with_audit(mut self, config: crate::config::AuditConfig) -> Self {
        self.config.audit = config;
        self
    }

    /// Use an explicit limiter instead of the configured backend
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Build the Guard
    pub fn build(self) -> Guard {
        let guard = Guard::new(self.config);
        match self.rate_limiter {
            Some(limiter) => guard.with_rate_limiter(limiter),
            None => guard,
        }
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
