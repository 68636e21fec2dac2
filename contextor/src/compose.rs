//! Answer composer: fragments + question -> model answer with citations.

use std::sync::Arc;

use ai_llm_service::chat::{ChatCompletion, ChatMessage, ChatRequest};
use tracing::{info, instrument};

use crate::api_types::{Answer, Citation};
use crate::context::build_context;
use crate::error::ContextorError;
use crate::fragment::Fragment;
use crate::prompt::PromptTemplate;

pub struct Composer {
    chat: Arc<dyn ChatCompletion>,
    domain: String,
    temperature: f32,
    max_tokens: u32,
}

impl Composer {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        domain: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            chat,
            domain: domain.into(),
            temperature,
            max_tokens,
        }
    }

    /// Builds the prompt, calls the model once and attaches citations.
    ///
    /// # Errors
    /// `Llm` when the generation call fails or times out.
    #[instrument(skip_all, fields(fragments = fragments.len()))]
    pub async fn compose(
        &self,
        query: &str,
        fragments: &[Fragment],
    ) -> Result<Answer, ContextorError> {
        let context = build_context(fragments);
        let template = PromptTemplate::new(&self.domain);

        let req = ChatRequest::new(vec![
            ChatMessage::system(template.system()),
            ChatMessage::user(template.user(&context, query, !fragments.is_empty())),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let body = self.chat.complete(&req).await?;
        info!(answer_chars = body.len(), context_chars = context.len(), "answer composed");

        Ok(Answer {
            body,
            citations: fragments.iter().map(Citation::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::chat::Role;

    use super::*;
    use crate::testing::{FakeChat, fragment};

    fn composer(chat: Arc<FakeChat>) -> Composer {
        Composer::new(chat, "SAS", 0.3, 1500)
    }

    #[tokio::test]
    async fn sends_system_and_user_messages_with_decoding_knobs() {
        let chat = Arc::new(FakeChat::answering("Use a MERGE with BY."));
        let frags = [fragment(1, "merge_dm", "")];

        let answer = composer(chat.clone())
            .compose("how to merge?", &frags)
            .await
            .unwrap();

        assert_eq!(answer.body, "Use a MERGE with BY.");
        assert_eq!(answer.citations.len(), 1);

        let req = chat.last_request();
        assert_eq!(req.temperature, Some(0.3));
        assert_eq!(req.max_tokens, Some(1500));
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(
            req.messages[0].content,
            "You are a helpful SAS programming assistant."
        );
        assert_eq!(req.messages[1].role, Role::User);
        assert!(req.messages[1].content.contains("CHUNK 1: macro - merge_dm"));
        assert!(req.messages[1].content.contains("USER QUESTION: how to merge?"));
    }

    #[tokio::test]
    async fn zero_fragments_still_calls_model() {
        let chat = Arc::new(FakeChat::answering("General advice."));

        let answer = composer(chat.clone()).compose("q", &[]).await.unwrap();

        assert!(answer.citations.is_empty());
        assert!(chat.last_request().messages[1]
            .content
            .contains("No relevant code chunks were found."));
    }

    #[tokio::test]
    async fn generation_timeout_surfaces_as_timeout() {
        let chat = Arc::new(FakeChat::timing_out());
        let err = composer(chat).compose("q", &[]).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
