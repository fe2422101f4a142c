//! Response assembly
//!
//! Every request ends in exactly one [`HumanizeOutcome`]. Failures never
//! carry a `humanized` field.

use serde::{Deserialize, Serialize};
use studentvibe_guard::RateLimitStatus;

use crate::error::{ErrorKind, HumanizeError};
use crate::persona::PersonaTag;

/// Successful rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanizeResult {
    /// Input text, byte for byte
    pub original: String,
    /// Model output, unmodified
    pub humanized: String,
    pub persona: PersonaTag,
}

/// Terminal state of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanizeOutcome {
    Success(HumanizeResult),
    /// Caller-correctable: validation, PII warning, rate limit
    Rejected {
        kind: ErrorKind,
        reason: String,
        status: u16,
        rate_limit: Option<RateLimitStatus>,
    },
    /// Server-side: configuration, generation, counter store
    Failure {
        kind: ErrorKind,
        message: String,
        status: u16,
    },
}

impl HumanizeOutcome {
    pub fn status(&self) -> u16 {
        match self {
            HumanizeOutcome::Success(_) => 200,
            HumanizeOutcome::Rejected { status, .. } | HumanizeOutcome::Failure { status, .. } => {
                *status
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HumanizeOutcome::Success(_))
    }

    /// Wire body for this outcome
    pub fn body(&self) -> ResponseBody {
        match self {
            HumanizeOutcome::Success(result) => ResponseBody::Success(result.clone()),
            HumanizeOutcome::Rejected {
                kind: ErrorKind::PiiWarning,
                reason,
                ..
            } => ResponseBody::Warning(WarningBody {
                warning: reason.clone(),
                requires_acknowledgement: true,
            }),
            HumanizeOutcome::Rejected { kind, reason, .. } => ResponseBody::Error(ErrorBody {
                error: reason.clone(),
                kind: *kind,
            }),
            HumanizeOutcome::Failure { kind, message, .. } => ResponseBody::Error(ErrorBody {
                error: message.clone(),
                kind: *kind,
            }),
        }
    }
}

impl From<Result<HumanizeResult, HumanizeError>> for HumanizeOutcome {
    fn from(result: Result<HumanizeResult, HumanizeError>) -> Self {
        match result {
            Ok(result) => HumanizeOutcome::Success(result),
            Err(err) => {
                let kind = err.kind();
                let status = err.status();
                if err.is_server_error() {
                    HumanizeOutcome::Failure {
                        kind,
                        message: err.to_string(),
                        status,
                    }
                } else {
                    let rate_limit = match &err {
                        HumanizeError::RateLimitExceeded(status) => Some(status.clone()),
                        _ => None,
                    };
                    HumanizeOutcome::Rejected {
                        kind,
                        reason: err.to_string(),
                        status,
                        rate_limit,
                    }
                }
            }
        }
    }
}

/// JSON body variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(HumanizeResult),
    Warning(WarningBody),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningBody {
    pub warning: String,
    pub requires_acknowledgement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}
