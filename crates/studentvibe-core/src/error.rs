//! Error types for the humanize pipeline

use serde::{Deserialize, Serialize};
use studentvibe_guard::{GuardError, PiiKind, RateLimitStatus};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, HumanizeError>;

/// Coarse error classification surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidInput,
    InputTooLarge,
    RateLimitExceeded,
    PiiWarning,
    MissingConfiguration,
    GenerationError,
    /// The rate-limit store failed; the request is refused rather than
    /// admitted unchecked
    RateLimitStoreError,
}

/// Everything that can stop a humanize request
#[derive(Debug, Error)]
pub enum HumanizeError {
    #[error("No text provided")]
    MissingText,

    #[error("Persona '{0}' not found")]
    UnknownPersona(String),

    #[error("Input exceeds maximum limit of 60,000 characters (approx 15k tokens).")]
    InputTooLarge { chars: usize },

    #[error("Rate limit exceeded. Try again in an hour.")]
    RateLimitExceeded(RateLimitStatus),

    #[error("{reason}")]
    PiiWarning { reason: String, kinds: Vec<PiiKind> },

    #[error("{0} environment variable is missing")]
    MissingConfiguration(String),

    #[error("{0}")]
    Generation(GenerationError),

    #[error("{0}")]
    RateLimitStore(#[from] GuardError),
}

impl From<GenerationError> for HumanizeError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential(var) => HumanizeError::MissingConfiguration(var),
            other => HumanizeError::Generation(other),
        }
    }
}

impl HumanizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HumanizeError::MissingText | HumanizeError::UnknownPersona(_) => ErrorKind::InvalidInput,
            HumanizeError::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            HumanizeError::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            HumanizeError::PiiWarning { .. } => ErrorKind::PiiWarning,
            HumanizeError::MissingConfiguration(_) => ErrorKind::MissingConfiguration,
            HumanizeError::Generation(_) => ErrorKind::GenerationError,
            HumanizeError::RateLimitStore(_) => ErrorKind::RateLimitStoreError,
        }
    }

    /// HTTP status the server answers with
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput | ErrorKind::InputTooLarge => 400,
            ErrorKind::PiiWarning => 422,
            ErrorKind::RateLimitExceeded => 429,
            ErrorKind::MissingConfiguration
            | ErrorKind::GenerationError
            | ErrorKind::RateLimitStoreError => 500,
        }
    }

    /// True when the environment, not the caller, is at fault
    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }
}

/// Failures of the text-generation call
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credential not configured; carries the variable name
    #[error("{0} environment variable is missing")]
    MissingCredential(String),

    /// The service answered with an error; message kept verbatim
    #[error("{message}")]
    Service { status: u16, message: String },

    /// Transport failure (DNS, TLS, connection reset...)
    #[error("{0}")]
    Transport(String),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    /// Response parsed but carried no text
    #[error("Generation returned no text{}", .0.as_deref().map(|r| format!(" (finish reason: {})", r)).unwrap_or_default())]
    EmptyCompletion(Option<String>),

    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::MAX_INPUT_CHARS;

    #[test]
    fn test_messages_match_wire_contract() {
        assert_eq!(HumanizeError::MissingText.to_string(), "No text provided");
        assert_eq!(
            HumanizeError::MissingConfiguration("GEMINI_API_KEY".into()).to_string(),
            "GEMINI_API_KEY environment variable is missing"
        );
        assert!(HumanizeError::InputTooLarge {
            chars: MAX_INPUT_CHARS + 1
        }
        .to_string()
        .starts_with("Input exceeds maximum limit of 60,000 characters"));
    }

    #[test]
    fn test_statuses() {
        assert_eq!(HumanizeError::MissingText.status(), 400);
        assert_eq!(HumanizeError::UnknownPersona("Pirate".into()).status(), 400);
        assert_eq!(HumanizeError::InputTooLarge { chars: 70_000 }.status(), 400);
        assert_eq!(
            HumanizeError::PiiWarning {
                reason: "x".into(),
                kinds: vec![]
            }
            .status(),
            422
        );
        assert_eq!(
            HumanizeError::Generation(GenerationError::Transport("reset".into())).status(),
            500
        );
    }

    #[test]
    fn test_missing_credential_becomes_configuration_error() {
        let err: HumanizeError = GenerationError::MissingCredential("GEMINI_API_KEY".into()).into();
        assert_eq!(err.kind(), ErrorKind::MissingConfiguration);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_service_message_is_verbatim() {
        let err: HumanizeError = GenerationError::Service {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".into(),
        }
        .into();
        assert_eq!(err.to_string(), "API key not valid. Please pass a valid API key.");
        assert_eq!(err.kind(), ErrorKind::GenerationError);
    }

    #[test]
    fn test_empty_completion_message() {
        assert_eq!(
            GenerationError::EmptyCompletion(Some("SAFETY".into())).to_string(),
            "Generation returned no text (finish reason: SAFETY)"
        );
        assert_eq!(
            GenerationError::EmptyCompletion(None).to_string(),
            "Generation returned no text"
        );
    }
}
