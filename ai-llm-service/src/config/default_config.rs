//! Default LLM configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by provider and role. Two roles are used by the application:
//!
//! - **Chat**      → the answering model
//! - **Embedding** → query embedding generator
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider kind (`ollama`, `openai`, `azure`), default `ollama`
//! - `LLM_TIMEOUT_SECS` = optional request timeout override
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = chat model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` (mandatory), `OPENAI_URL` (default `https://api.openai.com`)
//! - `OPENAI_MODEL` (mandatory), `OPENAI_EMBEDDING_MODEL` (default `text-embedding-ada-002`)
//!
//! Azure OpenAI:
//! - `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_DEPLOYMENT` (mandatory)
//! - `AZURE_OPENAI_API_VERSION` (default `2024-02-15-preview`)
//! - `AZURE_OPENAI_EMBEDDING_MODEL` (default `text-embedding-ada-002`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u64, must_env, validate_http_endpoint,
    },
};

const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";

/// Resolves the `(chat, embedding)` profile pair for the provider named in `LLM_KIND`.
///
/// # Errors
/// Missing or malformed variables for the selected provider.
pub fn configs_from_env() -> Result<(LlmModelConfig, LlmModelConfig), AiLlmError> {
    let provider: LlmProvider = env_opt("LLM_KIND")
        .unwrap_or_else(|| "ollama".to_string())
        .parse()?;

    match provider {
        LlmProvider::Ollama => Ok((config_ollama_chat()?, config_ollama_embedding()?)),
        LlmProvider::OpenAI => Ok((config_openai_chat()?, config_openai_embedding()?)),
        LlmProvider::AzureOpenAI => Ok((config_azure_chat()?, config_azure_embedding()?)),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        return local_ollama_url(&port);
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// `http://localhost:{port}` for a valid, non-zero TCP port.
fn local_ollama_url(raw: &str) -> Result<String, AiLlmError> {
    let port = raw
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
    Ok(format!("http://localhost:{port}"))
}

fn timeout_or(default: u64) -> Result<Option<u64>, AiLlmError> {
    Ok(Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(default)))
}

/// Chat profile served by Ollama.
///
/// # Env
/// - `OLLAMA_MODEL` (required)
pub fn config_ollama_chat() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("OLLAMA_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        api_version: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_or(DEFAULT_CHAT_TIMEOUT_SECS)?,
    })
}

/// Embedding profile served by Ollama.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        api_version: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: timeout_or(DEFAULT_EMBED_TIMEOUT_SECS)?,
    })
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

/// Chat profile served by the public OpenAI API.
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: must_env("OPENAI_MODEL")?,
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        api_version: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_or(DEFAULT_CHAT_TIMEOUT_SECS)?,
    })
}

/// Embedding profile served by the public OpenAI API.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_opt("OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        api_version: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_or(DEFAULT_EMBED_TIMEOUT_SECS)?,
    })
}

fn azure_base() -> Result<(String, String, String), AiLlmError> {
    let endpoint = must_env("AZURE_OPENAI_ENDPOINT")?;
    validate_http_endpoint("AZURE_OPENAI_ENDPOINT", &endpoint)?;
    let key = must_env("AZURE_OPENAI_API_KEY")?;
    let version =
        env_opt("AZURE_OPENAI_API_VERSION").unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.into());
    Ok((endpoint, key, version))
}

/// Chat profile served by an Azure OpenAI deployment.
///
/// # Env
/// - `AZURE_OPENAI_DEPLOYMENT` (required): chat deployment name
pub fn config_azure_chat() -> Result<LlmModelConfig, AiLlmError> {
    let (endpoint, key, version) = azure_base()?;
    Ok(LlmModelConfig {
        provider: LlmProvider::AzureOpenAI,
        model: must_env("AZURE_OPENAI_DEPLOYMENT")?,
        endpoint,
        api_key: Some(key),
        api_version: Some(version),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_or(DEFAULT_CHAT_TIMEOUT_SECS)?,
    })
}

/// Embedding profile served by an Azure OpenAI deployment.
pub fn config_azure_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let (endpoint, key, version) = azure_base()?;
    Ok(LlmModelConfig {
        provider: LlmProvider::AzureOpenAI,
        model: env_opt("AZURE_OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        endpoint,
        api_key: Some(key),
        api_version: Some(version),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_or(DEFAULT_EMBED_TIMEOUT_SECS)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_port_builds_local_url() {
        assert_eq!(local_ollama_url("11434").unwrap(), "http://localhost:11434");
        assert_eq!(local_ollama_url(" 8080 ").unwrap(), "http://localhost:8080");
    }

    #[test]
    fn ollama_port_rejects_out_of_range_values() {
        for bad in ["0", "65536", "-1", "port"] {
            let err = local_ollama_url(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    AiLlmError::Config(ConfigError::InvalidNumber {
                        var: "OLLAMA_PORT",
                        ..
                    })
                ),
                "{bad}: {err:?}"
            );
        }
    }
}
