//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use ai_llm_service::error_handler::{
    AiLlmError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, validate_range_f32,
};

use crate::error::ContextorError;

/// Pipeline knobs. All fields have defaults via [`Default`].
#[derive(Clone, Debug)]
pub struct ContextorConfig {
    /// Matches requested from the index when the caller does not say.
    pub top_k: u64,
    /// Sampling temperature of the answering model.
    pub temperature: f32,
    /// Output cap of the answering model.
    pub max_tokens: u32,
    /// Language/domain named in the assistant persona, e.g. `SAS`.
    pub domain: String,
    /// Base directory for relative `filepath` metadata.
    pub source_root: Option<PathBuf>,
    /// Files larger than this are not attached as full-file context.
    pub file_max_bytes: u64,
    /// Upper bound for one full-file read.
    pub file_read_timeout: Duration,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            temperature: 0.3,
            max_tokens: 1500,
            domain: "SAS".to_string(),
            source_root: None,
            file_max_bytes: 1024 * 1024,
            file_read_timeout: Duration::from_millis(2000),
        }
    }
}

impl ContextorConfig {
    /// Build from environment variables, falling back to [`Default`].
    ///
    /// `RAG_TOP_K`, `CHAT_TEMPERATURE`, `CHAT_MAX_TOKENS`, `ASSISTANT_DOMAIN`,
    /// `SOURCE_ROOT`, `FILE_MAX_BYTES`, `FILE_READ_TIMEOUT_MS`.
    ///
    /// # Example
    /// ```
    /// # use contextor::ContextorConfig;
    /// let cfg = ContextorConfig::from_env().unwrap();
    /// assert!(cfg.top_k >= 1);
    /// ```
    pub fn from_env() -> Result<Self, ContextorError> {
        let d = Self::default();
        let cfg = Self {
            top_k: env_opt_u64("RAG_TOP_K").map_err(config)?.unwrap_or(d.top_k),
            temperature: env_opt_f32("CHAT_TEMPERATURE")
                .map_err(config)?
                .unwrap_or(d.temperature),
            max_tokens: env_opt_u32("CHAT_MAX_TOKENS")
                .map_err(config)?
                .unwrap_or(d.max_tokens),
            domain: env_opt("ASSISTANT_DOMAIN").unwrap_or(d.domain),
            source_root: env_opt("SOURCE_ROOT").map(PathBuf::from),
            file_max_bytes: env_opt_u64("FILE_MAX_BYTES")
                .map_err(config)?
                .unwrap_or(d.file_max_bytes),
            file_read_timeout: env_opt_u64("FILE_READ_TIMEOUT_MS")
                .map_err(config)?
                .map(Duration::from_millis)
                .unwrap_or(d.file_read_timeout),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ContextorError> {
        if self.top_k == 0 {
            return Err(ContextorError::Config("RAG_TOP_K must be >= 1".into()));
        }
        if self.max_tokens == 0 {
            return Err(ContextorError::Config("CHAT_MAX_TOKENS must be >= 1".into()));
        }
        validate_range_f32("temperature", self.temperature, 0.0, 2.0).map_err(config)?;
        if self.file_read_timeout.is_zero() {
            return Err(ContextorError::Config(
                "FILE_READ_TIMEOUT_MS must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn config(e: AiLlmError) -> ContextorError {
    ContextorError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let cfg = ContextorConfig::default();
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.max_tokens, 1500);
        assert!((cfg.temperature - 0.3).abs() < f32::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let cfg = ContextorConfig {
            temperature: 3.0,
            ..ContextorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ContextorError::Config(_))));
    }
}
