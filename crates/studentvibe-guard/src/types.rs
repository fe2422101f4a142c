//! Core types for StudentVibe Guard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a client's quota after an admission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Maximum admissions per window
    pub limit: u32,
    /// Admissions left in the current window
    pub remaining: u32,
    /// When the oldest admission in the window expires
    pub reset_at: DateTime<Utc>,
}

/// Result of asking a rate limiter to admit a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Admission {
    /// Request admitted. `None` when no limit is enforced.
    Allowed(Option<RateLimitStatus>),
    /// Quota exhausted; `remaining` is always 0
    Denied(RateLimitStatus),
}

impl Admission {
    /// Check if the request was admitted
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed(_))
    }

    /// Quota details, if a limit is enforced
    pub fn status(&self) -> Option<&RateLimitStatus> {
        match self {
            Admission::Allowed(status) => status.as_ref(),
            Admission::Denied(status) => Some(status),
        }
    }
}

/// Kinds of personal information the scanner looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PiiKind {
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl std::fmt::Display for PiiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PiiKind::Email => write!(f, "Email"),
            PiiKind::Phone => write!(f, "Phone"),
        }
    }
}

/// Outcome of screening a request before any external call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenOutcome {
    /// Safe to proceed; carries the admission quota if one is enforced
    Cleared(Option<RateLimitStatus>),
    /// Text looks like it contains personal information and the caller has
    /// not acknowledged it yet
    Warned {
        /// Human-readable warning
        reason: String,
        /// What was found (kinds only, never the matched text)
        kinds: Vec<PiiKind>,
    },
    /// Client exceeded its quota
    Denied(RateLimitStatus),
}

impl ScreenOutcome {
    /// Check if the request may continue to generation
    pub fn is_cleared(&self) -> bool {
        matches!(self, ScreenOutcome::Cleared(_))
    }
}

/// Request context for guard operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientContext {
    /// Unique request ID
    pub request_id: Uuid,
    /// Rate-limit identity (network address)
    pub client_id: String,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            client_id: "127.0.0.1".to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl ClientContext {
    /// Create a new context with a fresh request ID
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client identity
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Build a context from an `X-Forwarded-For` value.
    ///
    /// The first address in the list is the originating client. Blank or
    /// missing headers fall back to `fallback`.
    pub fn from_forwarded_for(header: Option<&str>, fallback: &str) -> Self {
        let client_id = header
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .unwrap_or(fallback);

        Self::new().with_client_id(client_id)
    }
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Request context
    pub context: ClientContext,
    /// Content hash (the text itself is never recorded)
    pub content_hash: String,
    /// Content length in characters
    pub content_chars: usize,
    /// Screening decision
    pub result: AuditResult,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result for audit logging (simplified)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditResult {
    /// Request cleared for generation
    Cleared,
    /// PII warning returned
    Warned { kinds: Vec<PiiKind> },
    /// Quota exhausted
    Denied,
}

impl From<&ScreenOutcome> for AuditResult {
    fn from(outcome: &ScreenOutcome) -> Self {
        match outcome {
            ScreenOutcome::Cleared(_) => AuditResult::Cleared,
            ScreenOutcome::Warned { kinds, .. } => AuditResult::Warned {
                kinds: kinds.clone(),
            },
            ScreenOutcome::Denied(_) => AuditResult::Denied,
        }
    }
}
