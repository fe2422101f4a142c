//! # StudentVibe Core
//!
//! Rewrites polished machine-generated text so it reads like a student wrote
//! it, in one of three personas.
//!
//! A request flows through [`Humanizer`]:
//!
//! 1. **Validate**: text present, at most 60,000 characters, known persona
//! 2. **Screen**: PII warning, then the per-client sliding-window quota
//!    (see [`studentvibe_guard`])
//! 3. **Compose**: the persona's system instruction ([`compose`])
//! 4. **Generate**: one call to a [`Generator`], Gemini or the offline
//!    [`LocalRewriter`]
//! 5. **Assemble**: [`HumanizeOutcome`] with the matching status
//!
//! ```rust,no_run
//! use studentvibe_core::{ClientContext, Humanizer, HumanizerConfig, PersonaTag, RawHumanizeRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HumanizerConfig::load(None)?;
//!     let humanizer = Humanizer::from_config(&config).await?;
//!
//!     let request = RawHumanizeRequest::new("Subsequently, we delve deeper.", PersonaTag::College);
//!     let result = humanizer.humanize(request, &ClientContext::new()).await?;
//!     println!("{}", result.humanized);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod persona;
pub mod pipeline;
pub mod prompt;
pub mod result;
pub mod rewrite;
pub mod validate;

pub use config::{EngineKind, GenerationConfig, HumanizerConfig};
pub use error::{ConfigError, ErrorKind, GenerationError, HumanizeError, Result};
pub use generation::{GeminiClient, Generator};
pub use persona::{PersonaProfile, PersonaTag};
pub use pipeline::Humanizer;
pub use prompt::{compose, InstructionSet};
pub use result::{ErrorBody, HumanizeOutcome, HumanizeResult, ResponseBody, WarningBody};
pub use rewrite::LocalRewriter;
pub use validate::{validate, HumanizeRequest, RawHumanizeRequest, MAX_INPUT_CHARS};

pub use studentvibe_guard::{ClientContext, Guard, GuardConfig, RateLimitBackend, RateLimitStatus};
