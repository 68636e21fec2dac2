use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for large language model (LLM) inference.
///
/// This enum distinguishes between the local Ollama runtime, the public
/// OpenAI API, and Azure-hosted OpenAI deployments.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let p: LlmProvider = "azure".parse().unwrap();
/// assert_eq!(p, LlmProvider::AzureOpenAI);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI's public REST API.
    OpenAI,
    /// OpenAI models served from an Azure deployment.
    AzureOpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    /// Parses the value of `LLM_KIND` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            "azure" | "azure_openai" | "azure-openai" => Ok(LlmProvider::AzureOpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
