//! Audit logging for Guard
//!
//! Entries carry a hash and a character count of the submitted text. The
//! text itself and any PII matches are never written anywhere.

use crate::config::AuditConfig;
use crate::types::{AuditEntry, AuditResult, ClientContext, ScreenOutcome};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;

use tracing::{info, warn};

/// Audit logger
pub struct AuditLogger {
    config: AuditConfig,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Log a screening decision
    pub fn log(
        &self,
        context: &ClientContext,
        content: &str,
        outcome: &ScreenOutcome,
        duration_ms: u64,
    ) {
        if !self.config.enabled {
            return;
        }

        let entry = AuditEntry {
            context: context.clone(),
            content_hash: hash_content(content),
            content_chars: content.chars().count(),
            result: AuditResult::from(outcome),
            processing_time_ms: duration_ms,
        };

        self.emit(&entry);
    }

    /// Emit an audit entry
    fn emit(&self, entry: &AuditEntry) {
        match &entry.result {
            AuditResult::Denied => warn!(
                request_id = %entry.context.request_id,
                client_id = %entry.context.client_id,
                content_hash = %entry.content_hash,
                "Rate limit exceeded"
            ),
            result => info!(
                request_id = %entry.context.request_id,
                client_id = %entry.context.client_id,
                content_hash = %entry.content_hash,
                content_chars = entry.content_chars,
                result = ?result,
                processing_time_ms = entry.processing_time_ms,
                "Guard audit"
            ),
        }

        if let Some(ref path) = self.config.log_file {
            if let Err(e) = append_json_line(path, entry) {
                warn!(error = %e, path = %path, "Failed to write audit file");
            }
        }
    }
}

fn append_json_line(path: &str, entry: &AuditEntry) -> crate::Result<()> {
    let json = serde_json::to_string(entry)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{json}")?;
    Ok(())
}

/// Hash content for audit (privacy-preserving)
fn hash_content(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PiiKind;

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        let hash3 = hash_content("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_audit_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = AuditLogger::new(AuditConfig {
            enabled: false,
            log_file: Some(path.to_string_lossy().into_owned()),
        });

        logger.log(
            &ClientContext::default(),
            "test content",
            &ScreenOutcome::Cleared(None),
            10,
        );

        assert!(!path.exists());
    }

    #[test]
    fn test_audit_file_never_contains_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = AuditLogger::new(AuditConfig {
            enabled: true,
            log_file: Some(path.to_string_lossy().into_owned()),
        });

        let outcome = ScreenOutcome::Warned {
            reason: "sensitive".to_string(),
            kinds: vec![PiiKind::Email],
        };
        logger.log(&ClientContext::default(), "reach me at jo@example.com", &outcome, 1);
        logger.log(&ClientContext::default(), "second", &ScreenOutcome::Cleared(None), 1);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(!written.contains("jo@example.com"));

        let first: AuditEntry = serde_json::from_str(written.lines().next().unwrap()).unwrap();
        assert_eq!(
            first.result,
            AuditResult::Warned {
                kinds: vec![PiiKind::Email]
            }
        );
        assert_eq!(first.content_chars, 26);
    }
}
