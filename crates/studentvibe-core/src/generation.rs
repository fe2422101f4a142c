//! Text-generation backends
//!
//! The pipeline only sees [`Generator`]. The production backend is
//! [`GeminiClient`]; [`LocalRewriter`](crate::rewrite::LocalRewriter) runs
//! offline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::prompt::InstructionSet;

/// One-shot text generation: instruction and input in, completion out
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a single completion. The returned text is passed through to
    /// the caller unchanged.
    async fn generate(&self, instruction: &InstructionSet, text: &str) -> Result<String, GenerationError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    api_key: Option<String>,
    api_key_var: String,
    model: String,
    endpoint: String,
    timeout_secs: u64,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            api_key_var: config.api_key_var.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn map_transport(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, instruction: &InstructionSet, text: &str) -> Result<String, GenerationError> {
        // Checked per call so the service can start without a key and report
        // it on the first request
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::MissingCredential(self.api_key_var.clone()))?;

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: instruction.render(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, input_chars = text.chars().count(), "Calling Gemini");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("Gemini API error ({}): {}", status, raw));
            warn!(status = status.as_u16(), "Gemini returned an error");
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        parsed.into_text()
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String, GenerationError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GenerationError::EmptyCompletion(block_reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerationError::EmptyCompletion(candidate.finish_reason.or(block_reason)));
        }

        Ok(text)
    }
}
