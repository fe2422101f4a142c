//! Humanizer configuration
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional TOML file, then environment variables.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use studentvibe_guard::{GuardConfig, RateLimitBackend};

use crate::error::ConfigError;
use crate::generation::{GeminiClient, Generator};
use crate::rewrite::LocalRewriter;

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_VAR: &str = "STUDENTVIBE_CONFIG";

/// Which backend produces the rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Remote Gemini model
    #[default]
    Gemini,
    /// Offline rule-based rewriter
    Local,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HumanizerConfig {
    pub guard: GuardConfig,
    pub generation: GenerationConfig,
    pub engine: EngineKind,
    /// Fixed RNG seed for the local engine
    pub local_seed: Option<u64>,
}

/// Gemini client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API key. Normally supplied through the environment.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Environment variable the key is read from
    pub api_key_var: String,
    pub model: String,
    /// Base URL up to and including the API version
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_var: "GEMINI_API_KEY".to_string(),
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HumanizerConfig {
    /// Load from `path`, or from `$STUDENTVIBE_CONFIG` when no path is given,
    /// then apply environment overrides. No file at all means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var(CONFIG_PATH_VAR).ok().filter(|p| !p.is_empty());
        let path = path.map(Path::to_path_buf).or_else(|| from_env.map(Into::into));

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        let config = config.apply_env_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// - the variable named by `generation.api_key_var` sets the API key
    /// - `GEMINI_MODEL` sets the model
    /// - `REDIS_URL` or `UPSTASH_REDIS_URL` sets the counter store URL and
    ///   switches an unset backend to redis
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(&self.generation.api_key_var) {
            self.generation.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.generation.model = model;
        }

        if let Some(url) = lookup("REDIS_URL").or_else(|| lookup("UPSTASH_REDIS_URL")) {
            self.guard.rate_limit.redis_url = Some(url);
            if self.guard.rate_limit.backend == RateLimitBackend::None {
                self.guard.rate_limit.backend = RateLimitBackend::Redis;
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Invalid("generation.model must not be empty".into()));
        }
        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::Invalid("generation.timeout_secs must be positive".into()));
        }
        if self.guard.rate_limit.backend == RateLimitBackend::Redis
            && self.guard.rate_limit.redis_url.is_none()
        {
            return Err(ConfigError::Invalid(
                "rate_limit.backend = \"redis\" needs rate_limit.redis_url or REDIS_URL".into(),
            ));
        }
        self.guard.rate_limit.validate()?;
        Ok(())
    }

    /// Construct the configured generation backend
    pub fn build_generator(&self) -> Result<Arc<dyn Generator>, ConfigError> {
        match self.engine {
            EngineKind::Gemini => Ok(Arc::new(GeminiClient::new(&self.generation)?)),
            EngineKind::Local => Ok(Arc::new(match self.local_seed {
                Some(seed) => LocalRewriter::seeded(seed),
                None => LocalRewriter::new(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HumanizerConfig::default();
        assert_eq!(config.engine, EngineKind::Gemini);
        assert_eq!(config.generation.model, "gemini-1.5-flash");
        assert!(config.generation.api_key.is_none());
        assert_eq!(config.guard.rate_limit.backend, RateLimitBackend::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = HumanizerConfig::default().apply_env_from(env(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("UPSTASH_REDIS_URL", "rediss://example:6379"),
        ]));

        assert_eq!(config.generation.api_key.as_deref(), Some("secret"));
        assert_eq!(config.generation.model, "gemini-2.0-flash");
        assert_eq!(config.guard.rate_limit.backend, RateLimitBackend::Redis);
        assert_eq!(
            config.guard.rate_limit.redis_url.as_deref(),
            Some("rediss://example:6379")
        );
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = HumanizerConfig::default().apply_env_from(env(&[("GEMINI_API_KEY", "  ")]));
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn test_explicit_memory_backend_survives_redis_url() {
        let mut config = HumanizerConfig::default();
        config.guard.rate_limit.backend = RateLimitBackend::Memory;
        let config = config.apply_env_from(env(&[("REDIS_URL", "redis://localhost")]));
        assert_eq!(config.guard.rate_limit.backend, RateLimitBackend::Memory);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
engine = "local"
local_seed = 7

[generation]
model = "gemini-1.5-pro"

[guard.rate_limit]
backend = "memory"
max_requests = 5
"#
        )
        .unwrap();

        let config = HumanizerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.engine, EngineKind::Local);
        assert_eq!(config.local_seed, Some(7));
        assert_eq!(config.generation.model, "gemini-1.5-pro");
        assert_eq!(config.generation.timeout_secs, 120);
        assert_eq!(config.guard.rate_limit.backend, RateLimitBackend::Memory);
        assert_eq!(config.guard.rate_limit.max_requests, 5);
        assert_eq!(config.guard.rate_limit.window_secs, 3600);
    }

    #[test]
    fn test_bad_file_errors() {
        let missing = HumanizerConfig::from_file(Path::new("/nonexistent/studentvibe.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine = 42").unwrap();
        assert!(matches!(
            HumanizerConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let mut config = HumanizerConfig::default();
        config.guard.rate_limit.backend = RateLimitBackend::Redis;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rate_limit_window_is_checked() {
        let mut config = HumanizerConfig::default();
        config.guard.rate_limit.backend = RateLimitBackend::Memory;
        config.guard.rate_limit.window_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Guard(_))));

        config.guard.rate_limit.window_secs = u64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Guard(_))));

        config.guard.rate_limit.window_secs = 3600;
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "redis-store")]
    #[test]
    fn test_upstash_url_builds_a_tls_client() {
        let config = HumanizerConfig::default()
            .apply_env_from(env(&[("UPSTASH_REDIS_URL", "rediss://default:pw@example.upstash.io:6379")]));
        let url = config.guard.rate_limit.redis_url.as_deref().unwrap();
        assert!(studentvibe_guard::redis_store::open_client(url).is_ok());
    }

    #[test]
    fn test_build_generator() {
        let mut config = HumanizerConfig::default();
        assert_eq!(config.build_generator().unwrap().name(), "gemini");

        config.engine = EngineKind::Local;
        assert_eq!(config.build_generator().unwrap().name(), "local");
    }
}
