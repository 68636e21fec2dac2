//! Provider-agnostic chat request types and the [`ChatCompletion`] seam.
//!
//! Callers describe a completion as an ordered list of role-tagged messages
//! plus decoding knobs; concrete services translate it to their wire format.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::error_handler::AiLlmError;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name shared by Ollama and OpenAI.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single non-streaming completion request.
///
/// `temperature` and `max_tokens` override the profile defaults when set.
///
/// # Example
/// ```
/// use ai_llm_service::chat::{ChatMessage, ChatRequest};
///
/// let req = ChatRequest::new(vec![
///     ChatMessage::system("You are terse."),
///     ChatMessage::user("2+2="),
/// ])
/// .with_temperature(0.3)
/// .with_max_tokens(1500);
/// assert_eq!(req.messages.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn with_max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }
}

/// Boxed future returned by the async seams of this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything able to answer a [`ChatRequest`] with the first candidate's text.
///
/// Implemented by [`crate::service_profiles::LlmServiceProfiles`]; tests plug
/// in fakes.
pub trait ChatCompletion: Send + Sync {
    fn complete<'a>(&'a self, req: &'a ChatRequest) -> BoxFuture<'a, Result<String, AiLlmError>>;
}
