//! Retrieved code fragments and their metadata parsing.

use serde_json::Value;
use tracing::debug;

use crate::error::ContextorError;
use crate::source_file::FileStatus;

/// One retrieved match, ready for context assembly.
///
/// `rank` starts at 1 and follows the index order (best first).
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub rank: usize,
    pub score: f32,
    pub chunk_type: String,
    pub name: String,
    pub code: String,
    pub explanation: String,
    pub filename: String,
    pub line_start: u64,
    pub line_end: u64,
    /// Whole source file, or empty when it could not be loaded.
    pub full_file_content: String,
    pub file_status: FileStatus,
}

/// Metadata stored next to each vector in the index.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FragmentMetadata {
    pub chunk_type: String,
    pub name: String,
    pub code: String,
    pub explanation: String,
    pub filename: String,
    pub line_start: u64,
    pub line_end: u64,
    pub filepath: Option<String>,
}

impl FragmentMetadata {
    /// Parses a match payload.
    ///
    /// `chunk_type`, `name`, `code` and `explanation` are required strings.
    /// `filename` and line numbers are optional; line numbers may be stored
    /// as integers, integral floats or numeric strings.
    pub(crate) fn from_payload(rank: usize, payload: &Value) -> Result<Self, ContextorError> {
        Ok(Self {
            chunk_type: required(rank, payload, "chunk_type")?,
            name: required(rank, payload, "name")?,
            code: required(rank, payload, "code")?,
            explanation: required(rank, payload, "explanation")?,
            filename: optional_str(payload, "filename").unwrap_or_default(),
            line_start: line_number(rank, payload, "line_start"),
            line_end: line_number(rank, payload, "line_end"),
            filepath: optional_str(payload, "filepath").filter(|p| !p.trim().is_empty()),
        })
    }

    pub(crate) fn into_fragment(
        self,
        rank: usize,
        score: f32,
        full_file_content: String,
        file_status: FileStatus,
    ) -> Fragment {
        Fragment {
            rank,
            score,
            chunk_type: self.chunk_type,
            name: self.name,
            code: self.code,
            explanation: self.explanation,
            filename: self.filename,
            line_start: self.line_start,
            line_end: self.line_end,
            full_file_content,
            file_status,
        }
    }
}

fn required(rank: usize, payload: &Value, field: &'static str) -> Result<String, ContextorError> {
    optional_str(payload, field).ok_or(ContextorError::MissingField { rank, field })
}

fn optional_str(payload: &Value, field: &str) -> Option<String> {
    payload.get(field)?.as_str().map(str::to_owned)
}

fn line_number(rank: usize, payload: &Value, field: &str) -> u64 {
    let parsed = match payload.get(field) {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    parsed.unwrap_or_else(|| {
        debug!(rank, field, "unusable line number, using 0");
        0
    })
}
