//! PII (Personally Identifiable Information) detection
//!
//! The scanner is advisory. It only decides whether the caller should be
//! asked to confirm before their text leaves the process; false positives and
//! false negatives are both expected.

use crate::config::PiiConfig;
use crate::types::PiiKind;

use regex::Regex;

/// PII scanner for flagging likely personal information
pub struct PiiScanner {
    config: PiiConfig,
    patterns: PiiPatterns,
}

struct PiiPatterns {
    email: Regex,
    phone: Regex,
}

impl PiiPatterns {
    fn new() -> Self {
        Self {
            // Email addresses: local@domain.tld
            email: Regex::new(
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
            ).unwrap(),
            // Phone numbers: optional +CC, then 3-3-4 with optional parens and
            // `-`, `.` or space separators. The leading \b keeps it from
            // matching the tail of a longer digit run.
            phone: Regex::new(
                r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"
            ).unwrap(),
        }
    }
}

impl PiiScanner {
    /// Create a new PII scanner with the given configuration
    pub fn new(config: PiiConfig) -> Self {
        Self {
            config,
            patterns: PiiPatterns::new(),
        }
    }

    /// Returns true if anything in `text` looks like an email or phone number
    pub fn scan(&self, text: &str) -> bool {
        !self.detect(text).is_empty()
    }

    /// Kinds of PII present in `text`, in a fixed order, without duplicates
    pub fn detect(&self, text: &str) -> Vec<PiiKind> {
        if !self.config.enabled {
            return vec![];
        }

        let mut kinds = vec![];

        if self.config.detect_email && self.patterns.email.is_match(text) {
            kinds.push(PiiKind::Email);
        }

        if self.config.detect_phone && self.patterns.phone.is_match(text) {
            kinds.push(PiiKind::Phone);
        }

        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> PiiScanner {
        PiiScanner::new(PiiConfig::default())
    }

    #[test]
    fn test_email_detection() {
        assert!(scanner().scan("ping a@b.com tomorrow"));
        assert_eq!(
            scanner().detect("Contact me at john.doe@example.com for more info"),
            vec![PiiKind::Email]
        );
    }

    #[test]
    fn test_phone_formats() {
        let scanner = scanner();
        for text in [
            "call 555-123-4567",
            "call (555) 123-4567",
            "call 555.123.4567",
            "call +1 555 123 4567",
            "call +44-555-123-4567",
            "call 5551234567",
        ] {
            assert_eq!(scanner.detect(text), vec![PiiKind::Phone], "{text}");
        }
    }

    #[test]
    fn test_plain_text_is_clean() {
        let scanner = scanner();
        assert!(!scanner.scan("## Title\nSubsequently, this is a test."));
        assert!(!scanner.scan("The war lasted from 1939 to 1945."));
        assert!(!scanner.scan("Released on 2024-01-15 at 10:30."));
        assert!(!scanner.scan("Order 12345678901234 shipped."));
    }

    #[test]
    fn test_both_kinds() {
        let kinds = scanner().detect("mail x@y.org or ring 555-123-4567");
        assert_eq!(kinds, vec![PiiKind::Email, PiiKind::Phone]);
    }

    #[test]
    fn test_disabled() {
        let scanner = PiiScanner::new(PiiConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(!scanner.scan("a@b.com"));
    }

    #[test]
    fn test_kind_toggles() {
        let scanner = PiiScanner::new(PiiConfig {
            detect_email: false,
            ..Default::default()
        });
        assert!(!scanner.scan("a@b.com"));
        assert!(scanner.scan("555-123-4567"));
    }
}
