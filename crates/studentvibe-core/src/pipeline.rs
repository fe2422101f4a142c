//! The humanize pipeline
//!
//! validate -> screen (PII, then rate limit) -> compose -> generate -> assemble.
//! Any stage that fails ends the request; nothing after it runs.

use std::sync::Arc;
use std::time::Instant;

use studentvibe_guard::{ClientContext, Guard, ScreenOutcome};
use tracing::{debug, info, warn};

use crate::config::HumanizerConfig;
use crate::error::{ConfigError, HumanizeError, Result};
use crate::generation::Generator;
use crate::prompt::compose;
use crate::result::{HumanizeOutcome, HumanizeResult};
use crate::validate::{validate, RawHumanizeRequest};

/// Runs humanize requests. Cheap to share behind an `Arc`.
pub struct Humanizer {
    guard: Guard,
    generator: Arc<dyn Generator>,
}

impl Humanizer {
    pub fn new(guard: Guard, generator: Arc<dyn Generator>) -> Self {
        Self { guard, generator }
    }

    /// Build the guard and generator described by `config`. Connects to the
    /// counter store when one is configured.
    pub async fn from_config(config: &HumanizerConfig) -> std::result::Result<Self, ConfigError> {
        let guard = Guard::connect(config.guard.clone()).await?;
        let generator = config.build_generator()?;

        info!(
            engine = generator.name(),
            rate_limiter = guard.rate_limiter_name(),
            "Humanizer ready"
        );
        Ok(Self::new(guard, generator))
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Run one request to completion.
    ///
    /// On success `original` is the submitted text unchanged and `humanized`
    /// is the generator output unchanged.
    pub async fn humanize(
        &self,
        raw: RawHumanizeRequest,
        context: &ClientContext,
    ) -> Result<HumanizeResult> {
        let start = Instant::now();
        let request = validate(raw)?;

        match self
            .guard
            .screen(&request.text, request.acknowledge_sensitive_content, context)
            .await?
        {
            ScreenOutcome::Cleared(_) => {}
            ScreenOutcome::Warned { reason, kinds } => {
                return Err(HumanizeError::PiiWarning { reason, kinds });
            }
            ScreenOutcome::Denied(status) => {
                return Err(HumanizeError::RateLimitExceeded(status));
            }
        }

        let instruction = compose(request.persona);
        debug!(
            request_id = %context.request_id,
            persona = %request.persona,
            engine = self.generator.name(),
            "Generating"
        );

        let humanized = self
            .generator
            .generate(&instruction, &request.text)
            .await
            .map_err(|e| {
                warn!(request_id = %context.request_id, error = %e, "Generation failed");
                HumanizeError::from(e)
            })?;

        info!(
            request_id = %context.request_id,
            persona = %request.persona,
            input_chars = request.text.chars().count(),
            output_chars = humanized.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Humanized"
        );

        Ok(HumanizeResult {
            original: request.text,
            humanized,
            persona: request.persona,
        })
    }

    /// Like [`Humanizer::humanize`] but folds every failure into a
    /// [`HumanizeOutcome`]
    pub async fn process(&self, raw: RawHumanizeRequest, context: &ClientContext) -> HumanizeOutcome {
        let outcome = HumanizeOutcome::from(self.humanize(raw, context).await);
        if let HumanizeOutcome::Failure { kind, status, .. } = &outcome {
            warn!(request_id = %context.request_id, ?kind, status, "Request failed");
        }
        outcome
    }
}
