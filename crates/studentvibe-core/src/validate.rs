//! Request validation

use serde::{Deserialize, Serialize};

use crate::error::{HumanizeError, Result};
use crate::persona::PersonaTag;

/// Hard cap on input size, in characters (roughly 15k tokens)
pub const MAX_INPUT_CHARS: usize = 60_000;

/// Request body as it arrives on the wire; every field may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHumanizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub acknowledge_sensitive_content: bool,
}

impl RawHumanizeRequest {
    pub fn new(text: impl Into<String>, persona: PersonaTag) -> Self {
        Self {
            text: Some(text.into()),
            persona: Some(persona.to_string()),
            acknowledge_sensitive_content: false,
        }
    }

    pub fn acknowledged(mut self) -> Self {
        self.acknowledge_sensitive_content = true;
        self
    }
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanizeRequest {
    pub text: String,
    pub persona: PersonaTag,
    pub acknowledge_sensitive_content: bool,
}

/// Check presence, size and persona. No side effects.
///
/// Whitespace-only text counts as missing. A missing persona defaults to
/// College.
pub fn validate(raw: RawHumanizeRequest) -> Result<HumanizeRequest> {
    let text = match raw.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(HumanizeError::MissingText),
    };

    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(HumanizeError::InputTooLarge { chars });
    }

    let persona = match raw.persona.as_deref().map(str::trim) {
        None | Some("") => PersonaTag::default(),
        Some(name) => name.parse()?,
    };

    Ok(HumanizeRequest {
        text,
        persona,
        acknowledge_sensitive_content: raw.acknowledge_sensitive_content,
    })
}
