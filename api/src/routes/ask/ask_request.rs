use contextor::Citation;
use serde::{Deserialize, Serialize};

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Optional override: number of matches to fetch from the vector index.
    #[serde(default)]
    pub top_k: Option<u64>,
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Same text the chat surface would show (body + citations).
    pub answer: String,
    /// Model answer only.
    pub body: String,
    pub citations: Vec<CitationItem>,
}

/// One retrieved chunk the answer was grounded on.
#[derive(Debug, Serialize)]
pub struct CitationItem {
    pub rank: usize,
    pub chunk_type: String,
    pub name: String,
    pub score: f32,
    pub filename: String,
    pub line_start: u64,
    pub line_end: u64,
    /// `loaded`, `not_found`, `too_large`, ...
    pub file_status: &'static str,
}

impl From<Citation> for CitationItem {
    fn from(c: Citation) -> Self {
        Self {
            rank: c.rank,
            file_status: c.file_status.as_str(),
            chunk_type: c.chunk_type,
            name: c.name,
            score: c.score,
            filename: c.filename,
            line_start: c.line_start,
            line_end: c.line_end,
        }
    }
}
