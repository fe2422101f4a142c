//! # StudentVibe Guard
//!
//! Screening that runs before a humanize request reaches the text-generation
//! service:
//!
//! - **PII warning**: flags email- and phone-like text and asks the caller to
//!   acknowledge before it is sent anywhere
//! - **Rate limiting**: sliding-window quota per client address, backed by
//!   nothing, process memory, or a shared Redis store
//! - **Audit**: one structured event per decision, hashed, never the text
//!
//! ## Quick Start
//!
//! ```rust
//! use studentvibe_guard::{ClientContext, Guard, GuardConfig, ScreenOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let guard = Guard::connect(GuardConfig::default()).await?;
//!     let ctx = ClientContext::from_forwarded_for(Some("203.0.113.7"), "127.0.0.1");
//!
//!     match guard.screen("Mail me at a@b.com", false, &ctx).await? {
//!         ScreenOutcome::Cleared(_) => println!("go ahead"),
//!         ScreenOutcome::Warned { reason, .. } => println!("confirm first: {}", reason),
//!         ScreenOutcome::Denied(status) => println!("retry after {}", status.reset_at),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod guard;
pub mod pii;
pub mod rate_limit;
#[cfg(feature = "redis-store")]
pub mod redis_store;
pub mod types;

pub use config::{GuardConfig, RateLimitBackend};
pub use error::{GuardError, Result};
pub use guard::{Guard, GuardBuilder, PII_WARNING};
pub use rate_limit::{MemorySlidingWindow, NoopLimiter, RateLimiter};
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::GuardConfig;
    pub use crate::error::{GuardError, Result};
    pub use crate::guard::Guard;
    pub use crate::rate_limit::RateLimiter;
    pub use crate::types::*;
}
