//! Retrieval-augmented question answering over an indexed code corpus.
//!
//! Public API: [`Contextor`]. A question goes through three stages:
//! the [`Retriever`] embeds it and fetches ranked [`Fragment`]s (plus full
//! source files when available), [`build_context`] renders them into one
//! text block, and the [`Composer`] asks the chat model and attaches
//! [`Citation`]s.

mod api_types;
mod cfg;
mod compose;
mod context;
mod error;
mod fragment;
mod prompt;
mod retrieve;
mod source_file;

#[cfg(test)]
mod testing;

pub use api_types::{Answer, AskOptions, CITATIONS_HEADER, Citation};
pub use cfg::ContextorConfig;
pub use compose::Composer;
pub use context::{ContextBuilder, build_context};
pub use error::ContextorError;
pub use fragment::Fragment;
pub use prompt::PromptTemplate;
pub use retrieve::Retriever;
pub use source_file::{FileReader, FileStatus};

use std::sync::Arc;

use ai_llm_service::{ChatCompletion, ChatMessage, LlmServiceProfiles};
use rag_store::{EmbeddingsProvider, LlmEmbedder, RagConfig, RagStore};
use tracing::{debug, info, instrument};

/// The whole pipeline bound to its external services.
///
/// Construct once and share behind an `Arc`; every call is independent.
pub struct Contextor {
    retriever: Retriever,
    composer: Composer,
    default_top_k: u64,
}

impl Contextor {
    /// Wires the pipeline from explicit parts.
    pub fn new(
        cfg: &ContextorConfig,
        store: Arc<RagStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        chat: Arc<dyn ChatCompletion>,
    ) -> Self {
        let files = FileReader::new(
            cfg.source_root.clone(),
            cfg.file_max_bytes,
            cfg.file_read_timeout,
        );
        Self {
            retriever: Retriever::new(store, embedder, files),
            composer: Composer::new(chat, cfg.domain.clone(), cfg.temperature, cfg.max_tokens),
            default_top_k: cfg.top_k,
        }
    }

    /// Builds everything from environment variables on top of a shared
    /// LLM service (used both for embeddings and chat).
    ///
    /// # Errors
    /// `Config` or `Rag` when the environment is incomplete or invalid.
    pub fn from_env(svc: Arc<LlmServiceProfiles>) -> Result<Self, ContextorError> {
        let cfg = ContextorConfig::from_env()?;
        let rag_cfg = RagConfig::from_env()?;
        let dim = rag_cfg.embedding_dim;
        let store = Arc::new(RagStore::new(rag_cfg)?);
        let embedder = Arc::new(LlmEmbedder::new(svc.clone(), dim));

        info!(
            top_k = cfg.top_k,
            domain = %cfg.domain,
            source_root = ?cfg.source_root,
            "contextor ready"
        );
        Ok(Self::new(&cfg, store, embedder, svc))
    }

    /// Answers `question` with retrieved context and returns the answer
    /// together with its citations.
    ///
    /// # Errors
    /// - `EmptyQuery` for blank input
    /// - `MissingField` when the index holds malformed metadata
    /// - `Rag` / `Llm` for service failures (see [`ContextorError::is_timeout`])
    ///
    /// # Example
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use contextor::{AskOptions, Contextor};
    /// # use ai_llm_service::{LlmServiceProfiles, config::default_config::configs_from_env};
    /// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let (chat, emb) = configs_from_env()?;
    /// let ctx = Contextor::from_env(Arc::new(LlmServiceProfiles::new(chat, emb)?))?;
    /// let answer = ctx.ask("How is ADSL derived?", AskOptions::default()).await?;
    /// println!("{}", answer.render());
    /// # Ok(()) }
    /// ```
    #[instrument(skip_all, fields(top_k = opts.top_k))]
    pub async fn ask(&self, question: &str, opts: AskOptions) -> Result<Answer, ContextorError> {
        if question.trim().is_empty() {
            return Err(ContextorError::EmptyQuery);
        }
        let top_k = if opts.top_k == 0 {
            self.default_top_k
        } else {
            opts.top_k
        };

        let fragments = self.retriever.retrieve(question, top_k).await?;
        self.composer.compose(question, &fragments).await
    }

    /// Chat-surface entry point: answer text with the citation block appended.
    ///
    /// Prior turns are accepted for the host UI but do not influence the prompt.
    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ContextorError> {
        debug!(history_turns = history.len(), "history not used for retrieval");
        let answer = self.ask(message, AskOptions::default()).await?;
        Ok(answer.render())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::testing::{FakeChat, FakeEmbedder, FakeIndex, chunk_payload};

    struct Harness {
        contextor: Contextor,
        index: Arc<FakeIndex>,
        embedder: Arc<FakeEmbedder>,
        chat: Arc<FakeChat>,
    }

    fn harness(hits: Vec<(f32, serde_json::Value)>, cfg: ContextorConfig) -> Harness {
        let index = Arc::new(FakeIndex::new(hits));
        let embedder = Arc::new(FakeEmbedder::default());
        let chat = Arc::new(FakeChat::answering("Here is how."));
        let contextor = Contextor::new(
            &cfg,
            Arc::new(RagStore::with_index(index.clone())),
            embedder.clone(),
            chat.clone(),
        );
        Harness {
            contextor,
            index,
            embedder,
            chat,
        }
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_any_call() {
        let h = harness(vec![], ContextorConfig::default());

        let err = h.contextor.ask("   \n", AskOptions::default()).await.unwrap_err();

        assert!(matches!(err, ContextorError::EmptyQuery));
        assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
        assert!(h.chat.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn question_reaches_the_prompt_verbatim() {
        let h = harness(
            vec![(0.8, chunk_payload("macro", "m"))],
            ContextorConfig::default(),
        );

        h.contextor
            .ask("  How do I merge?\n", AskOptions::default())
            .await
            .unwrap();

        let prompt = &h.chat.last_request().messages[1].content;
        assert!(prompt.contains("USER QUESTION:   How do I merge?\n\n"));
    }

    #[tokio::test]
    async fn zero_top_k_uses_configured_default() {
        let h = harness(
            vec![(0.8, chunk_payload("macro", "m"))],
            ContextorConfig::default(),
        );

        h.contextor.ask("q", AskOptions { top_k: 0 }).await.unwrap();
        h.contextor.ask("q", AskOptions { top_k: 7 }).await.unwrap();

        assert_eq!(h.index.requested_top_k(), vec![3, 7]);
    }

    #[tokio::test]
    async fn respond_appends_one_citation_per_fragment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.sas"), "%macro a; %mend;").unwrap();
        let mut first = chunk_payload("macro", "a");
        first["filepath"] = json!("a.sas");
        first["line_start"] = json!(12);
        first["line_end"] = json!(40);

        let cfg = ContextorConfig {
            source_root: Some(dir.path().into()),
            ..ContextorConfig::default()
        };
        let h = harness(
            vec![(0.91234, first), (0.5, chunk_payload("data_step", "b"))],
            cfg,
        );

        let text = h.contextor.respond("how?", &[]).await.unwrap();

        let (body, tail) = text.split_once(CITATIONS_HEADER).unwrap();
        assert_eq!(body, "Here is how.");
        let lines: Vec<_> = tail.lines().collect();
        assert_eq!(
            lines,
            vec![
                "- macro: `a` (score: 0.912) 📁 a.sas (Lines 12-40)",
                "- data_step: `b` (score: 0.500) 📁 b.sas (Lines 1-9)",
            ]
        );

        let prompt = &h.chat.last_request().messages[1].content;
        assert_eq!(prompt.matches("--- FULL FILE CONTEXT ---").count(), 1);
        assert!(prompt.contains("%macro a; %mend;"));
    }

    #[tokio::test]
    async fn history_does_not_change_the_prompt() {
        let h = harness(
            vec![(0.8, chunk_payload("macro", "m"))],
            ContextorConfig::default(),
        );

        h.contextor.respond("q", &[]).await.unwrap();
        let without = h.chat.last_request();
        h.contextor
            .respond("q", &[ChatMessage::user("earlier turn")])
            .await
            .unwrap();
        let with = h.chat.last_request();

        assert_eq!(without, with);
    }

    #[tokio::test]
    async fn integrity_errors_skip_generation() {
        let h = harness(vec![(0.8, json!({"name": "orphan"}))], ContextorConfig::default());

        let err = h.contextor.ask("q", AskOptions::default()).await.unwrap_err();

        assert!(matches!(err, ContextorError::MissingField { rank: 1, .. }));
        assert!(h.chat.requests.lock().unwrap().is_empty());
    }
}
