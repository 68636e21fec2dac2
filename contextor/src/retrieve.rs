//! Retriever: question text -> ranked [`Fragment`]s.
//!
//! Embeds the question once, asks the index for the nearest matches, parses
//! their metadata and attaches full source files when they can be read.

use std::sync::Arc;

use rag_store::{EmbeddingsProvider, RagQuery, RagStore};
use tracing::{debug, info, instrument};

use crate::error::ContextorError;
use crate::fragment::{Fragment, FragmentMetadata};
use crate::source_file::{FileReader, FileStatus};

pub struct Retriever {
    store: Arc<RagStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
    files: FileReader,
}

impl Retriever {
    pub fn new(
        store: Arc<RagStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        files: FileReader,
    ) -> Self {
        Self {
            store,
            embedder,
            files,
        }
    }

    /// Returns at most `top_k` fragments in index order, ranks starting at 1.
    ///
    /// `top_k == 0` returns an empty list without touching any service.
    ///
    /// # Errors
    /// - `Rag` when embedding or the index search fails
    /// - `MissingField` when a match lacks required metadata
    #[instrument(skip_all, fields(top_k = top_k))]
    pub async fn retrieve(&self, query: &str, top_k: u64) -> Result<Vec<Fragment>, ContextorError> {
        if top_k == 0 {
            debug!("top_k is 0, nothing to retrieve");
            return Ok(Vec::new());
        }

        let hits = self
            .store
            .rag_context(RagQuery { text: query, top_k }, self.embedder.as_ref())
            .await?;

        // Validate every match before any file I/O.
        let parsed = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| FragmentMetadata::from_payload(i + 1, &hit.payload))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(parsed.len());
        for (i, (meta, hit)) in parsed.into_iter().zip(&hits).enumerate() {
            let (content, status) = self.files.read(meta.filepath.as_deref()).await;
            out.push(meta.into_fragment(i + 1, hit.score, content, status));
        }

        let with_file = out
            .iter()
            .filter(|f| f.file_status == FileStatus::Loaded)
            .count();
        info!(fragments = out.len(), with_file, "retrieval completed");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::testing::{FakeEmbedder, FakeIndex, chunk_payload};

    fn retriever(
        index: Arc<FakeIndex>,
        embedder: Arc<FakeEmbedder>,
        root: Option<std::path::PathBuf>,
    ) -> Retriever {
        Retriever::new(
            Arc::new(RagStore::with_index(index)),
            embedder,
            FileReader::new(root, 1024 * 1024, std::time::Duration::from_secs(2)),
        )
    }

    #[tokio::test]
    async fn two_matches_for_top_three_keep_order_and_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.sas"), "data a; run;").unwrap();

        let mut first = chunk_payload("macro", "alpha");
        first["filepath"] = json!("a.sas");
        let second = chunk_payload("data_step", "beta");
        let index = Arc::new(FakeIndex::new(vec![(0.9, first), (0.7, second)]));
        let embedder = Arc::new(FakeEmbedder::default());

        let frags = retriever(index.clone(), embedder.clone(), Some(dir.path().into()))
            .retrieve("how do I merge?", 3)
            .await
            .unwrap();

        assert_eq!(frags.len(), 2);
        assert_eq!((frags[0].rank, frags[0].name.as_str()), (1, "alpha"));
        assert_eq!((frags[1].rank, frags[1].name.as_str()), (2, "beta"));
        assert_eq!(frags[0].full_file_content, "data a; run;");
        assert_eq!(frags[1].full_file_content, "");
        assert_eq!(frags[1].file_status, FileStatus::NotRecorded);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(index.requested_top_k(), vec![3]);
    }

    #[tokio::test]
    async fn missing_file_does_not_fail_retrieval() {
        let mut p = chunk_payload("macro", "gone");
        p["filepath"] = json!("/no/such/dir/gone.sas");
        let index = Arc::new(FakeIndex::new(vec![(0.5, p)]));

        let frags = retriever(index, Arc::new(FakeEmbedder::default()), None)
            .retrieve("q", 3)
            .await
            .unwrap();

        assert_eq!(frags[0].full_file_content, "");
        assert_eq!(frags[0].file_status, FileStatus::NotFound);
    }

    #[tokio::test]
    async fn zero_top_k_skips_services() {
        let index = Arc::new(FakeIndex::new(vec![(0.5, chunk_payload("macro", "x"))]));
        let embedder = Arc::new(FakeEmbedder::default());

        let frags = retriever(index.clone(), embedder.clone(), None)
            .retrieve("q", 0)
            .await
            .unwrap();

        assert!(frags.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert!(index.requested_top_k().is_empty());
    }

    #[tokio::test]
    async fn integrity_error_fails_whole_request() {
        let mut broken = chunk_payload("macro", "b");
        broken.as_object_mut().unwrap().remove("code");
        let index = Arc::new(FakeIndex::new(vec![
            (0.9, chunk_payload("macro", "a")),
            (0.8, broken),
        ]));

        let err = retriever(index, Arc::new(FakeEmbedder::default()), None)
            .retrieve("q", 3)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContextorError::MissingField { rank: 2, field: "code" }
        ));
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let index = Arc::new(FakeIndex::new(vec![]));
        let embedder = Arc::new(FakeEmbedder::failing());

        let err = retriever(index, embedder, None)
            .retrieve("q", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ContextorError::Rag(_)));
    }
}
