//! Configuration for StudentVibe Guard

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, Result};

/// Longest accepted rate-limit window (30 days)
pub const MAX_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;

/// Main configuration for Guard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// PII detection configuration
    pub pii: PiiConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
    /// Audit configuration
    pub audit: AuditConfig,
}

impl GuardConfig {
    /// PII warnings only: no rate limiting, no audit trail.
    ///
    /// This is what the command-line front end runs with.
    pub fn minimal() -> Self {
        Self {
            pii: PiiConfig::default(),
            rate_limit: RateLimitConfig {
                backend: RateLimitBackend::None,
                ..Default::default()
            },
            audit: AuditConfig {
                enabled: false,
                ..Default::default()
            },
        }
    }
}

/// PII detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PiiConfig {
    /// Enable PII detection
    pub enabled: bool,
    /// Detect emails
    pub detect_email: bool,
    /// Detect phone numbers
    pub detect_phone: bool,
}

impl Default for PiiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detect_email: true,
            detect_phone: true,
        }
    }
}

/// Where admission counters live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// No store configured: every request is admitted
    #[default]
    None,
    /// Per-process sliding-window log
    Memory,
    /// Shared Redis sorted sets, durable across restarts and instances
    Redis,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Counter store
    pub backend: RateLimitBackend,
    /// Redis connection URL (required for the redis backend)
    pub redis_url: Option<String>,
    /// Admitted requests per window per client
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
    /// Key namespace in the shared store
    pub key_prefix: String,
    /// Identity used when no forwarded address is present
    pub fallback_identity: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            backend: RateLimitBackend::None,
            redis_url: None,
            max_requests: 3,
            window_secs: 60 * 60,
            key_prefix: "studentvibe:ratelimit".to_string(),
            fallback_identity: "127.0.0.1".to_string(),
        }
    }
}

impl RateLimitConfig {
    /// Reject settings that would disable or break the quota. A `None`
    /// backend enforces nothing, so anything goes.
    pub fn validate(&self) -> Result<()> {
        if self.backend == RateLimitBackend::None {
            return Ok(());
        }
        if self.max_requests == 0 {
            return Err(GuardError::ConfigError(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        if self.window_secs == 0 || self.window_secs > MAX_WINDOW_SECS {
            return Err(GuardError::ConfigError(format!(
                "rate_limit.window_secs must be between 1 and {}, got {}",
                MAX_WINDOW_SECS, self.window_secs
            )));
        }
        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging
    pub enabled: bool,
    /// Append JSON lines to this file as well as emitting tracing events
    pub log_file: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 3);
        assert_eq!(config.window_secs, 3600);
        assert_eq!(config.backend, RateLimitBackend::None);
    }

    #[test]
    fn test_window_bounds() {
        let memory = |window_secs| RateLimitConfig {
            backend: RateLimitBackend::Memory,
            window_secs,
            ..Default::default()
        };

        assert!(memory(3600).validate().is_ok());
        assert!(memory(MAX_WINDOW_SECS).validate().is_ok());
        assert!(matches!(memory(0).validate(), Err(GuardError::ConfigError(_))));
        assert!(matches!(
            memory(MAX_WINDOW_SECS + 1).validate(),
            Err(GuardError::ConfigError(_))
        ));
        assert!(memory(u64::MAX).validate().is_err());

        let zero_requests = RateLimitConfig {
            max_requests: 0,
            ..memory(3600)
        };
        assert!(zero_requests.validate().is_err());

        // Nothing is enforced without a store
        let none = RateLimitConfig {
            window_secs: 0,
            max_requests: 0,
            ..Default::default()
        };
        assert!(none.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GuardConfig =
            serde_json::from_str(r#"{"rate_limit": {"backend": "memory"}}"#).unwrap();

        assert_eq!(config.rate_limit.backend, RateLimitBackend::Memory);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert!(config.pii.enabled);
        assert!(config.audit.enabled);
    }
}
