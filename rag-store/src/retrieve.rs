//! Retrieval: embed the query text and fetch the nearest payloads.

use tracing::{debug, trace};

use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::record::{RagHit, RagQuery};

/// Embeds the query text and returns hits in index order.
///
/// Makes one embedding call and one index call. The result never holds more
/// than `query.top_k` hits, even if the backend returns more.
///
/// # Errors
/// Returns embedding/provider errors or index failures.
pub async fn rag_context(
    index: &dyn VectorIndex,
    query: RagQuery<'_>,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<RagHit>, RagError> {
    trace!("retrieve::rag_context top_k={}", query.top_k);

    let qv = provider.embed(query.text).await?;
    debug!(dim = qv.len(), "query embedded");

    let mut hits = index.search(qv, query.top_k, /* with_payload = */ true).await?;
    hits.truncate(usize::try_from(query.top_k).unwrap_or(usize::MAX));

    let out: Vec<RagHit> = hits
        .into_iter()
        .map(|(score, payload)| RagHit { score, payload })
        .collect();

    trace!("retrieve::rag_context hits={}", out.len());
    Ok(out)
}
