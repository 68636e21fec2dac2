//! Public API types re-used by external crates (e.g., the HTTP API layer).

use std::fmt;

use crate::fragment::Fragment;
use crate::source_file::FileStatus;

/// Header that separates the model answer from the citation list.
pub const CITATIONS_HEADER: &str = "\n\n---\n**📚 Retrieved Chunks:**\n";

/// Options for a single question.
///
/// Setting `top_k` to `0` means: "use the value from env-config".
///
/// # Example
/// ```
/// use contextor::AskOptions;
/// let opts = AskOptions { top_k: 5 };
/// assert_eq!(opts.top_k, 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AskOptions {
    /// Matches to fetch from the vector index. `0` falls back to `RAG_TOP_K`.
    pub top_k: u64,
}

/// Reference to one retrieved fragment shown under the answer.
#[derive(Clone, Debug, PartialEq)]
pub struct Citation {
    pub rank: usize,
    pub chunk_type: String,
    pub name: String,
    pub score: f32,
    pub filename: String,
    pub line_start: u64,
    pub line_end: u64,
    /// Whether the full source file reached the prompt. Not rendered.
    pub file_status: FileStatus,
}

impl From<&Fragment> for Citation {
    fn from(f: &Fragment) -> Self {
        Self {
            rank: f.rank,
            chunk_type: f.chunk_type.clone(),
            name: f.name.clone(),
            score: f.score,
            filename: f.filename.clone(),
            line_start: f.line_start,
            line_end: f.line_end,
            file_status: f.file_status.clone(),
        }
    }
}

/// One line: ``- macro: `merge_dm` (score: 0.912) 📁 merge_dm.sas (Lines 12-40)``.
impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: `{}` (score: {:.3}) 📁 {} (Lines {}-{})",
            self.chunk_type, self.name, self.score, self.filename, self.line_start, self.line_end
        )
    }
}

/// Model answer plus the fragments it was grounded on.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    /// Text returned by the model, unmodified.
    pub body: String,
    /// One entry per retrieved fragment, in rank order.
    pub citations: Vec<Citation>,
}

impl Answer {
    /// Body followed by [`CITATIONS_HEADER`] and one line per citation.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)?;
        f.write_str(CITATIONS_HEADER)?;
        for c in &self.citations {
            writeln!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fragment;

    #[test]
    fn citation_line_uses_three_decimals() {
        let mut f = fragment(1, "merge_dm", "");
        f.score = 0.91234;
        assert_eq!(
            Citation::from(&f).to_string(),
            "- macro: `merge_dm` (score: 0.912) 📁 merge_dm.sas (Lines 3-8)"
        );
    }

    #[test]
    fn rendered_answer_has_one_line_per_citation() {
        let frags = [fragment(1, "a", ""), fragment(2, "b", ""), fragment(3, "c", "")];
        let answer = Answer {
            body: "Use PROC SORT first.".into(),
            citations: frags.iter().map(Citation::from).collect(),
        };

        let text = answer.render();
        assert!(text.starts_with("Use PROC SORT first.\n\n---\n**📚 Retrieved Chunks:**\n"));
        let (_, tail) = text.split_once(CITATIONS_HEADER).unwrap();
        assert_eq!(tail.lines().count(), 3);
        assert!(tail.lines().all(|l| l.starts_with("- macro: `")));
    }

    #[test]
    fn no_fragments_leaves_empty_citation_block() {
        let answer = Answer {
            body: "I found nothing relevant.".into(),
            citations: vec![],
        };
        assert_eq!(
            answer.render(),
            format!("I found nothing relevant.{CITATIONS_HEADER}")
        );
    }
}
