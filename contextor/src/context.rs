//! Context assembly: ranked fragments -> one text block for the prompt.
//!
//! Each fragment gets a header with rank, type, name, file and line range,
//! an optional full-file section and the chunk itself:
//!
//! ```text
//!
//! ======================================================================
//! CHUNK 1: macro - merge_dm
//! File: merge_dm.sas (Lines 12-40)
//! ======================================================================
//!
//! --- FULL FILE CONTEXT ---
//! ...
//!
//! --- SPECIFIC CHUNK ---
//! Explanation: ...
//! Code:
//! ...
//! ```

use crate::fragment::Fragment;

const SEPARATOR_WIDTH: usize = 70;

/// Incremental builder; [`build_context`] is the one-shot form.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    out: String,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment section.
    pub fn push(&mut self, f: &Fragment) -> &mut Self {
        let sep = "=".repeat(SEPARATOR_WIDTH);

        self.out.push('\n');
        self.out.push_str(&sep);
        self.out.push('\n');
        self.out
            .push_str(&format!("CHUNK {}: {} - {}\n", f.rank, f.chunk_type, f.name));
        self.out.push_str(&format!(
            "File: {} (Lines {}-{})\n",
            f.filename, f.line_start, f.line_end
        ));
        self.out.push_str(&sep);
        self.out.push('\n');

        if !f.full_file_content.is_empty() {
            self.out.push_str("\n--- FULL FILE CONTEXT ---\n");
            self.out.push_str(&f.full_file_content);
            self.out.push('\n');
        }

        self.out.push_str("\n--- SPECIFIC CHUNK ---\n");
        self.out
            .push_str(&format!("Explanation: {}\nCode:\n{}\n", f.explanation, f.code));
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Renders all fragments in the given order. Zero fragments give `""`.
///
/// Pure: the same input always yields the same text.
pub fn build_context(fragments: &[Fragment]) -> String {
    let mut b = ContextBuilder::new();
    for f in fragments {
        b.push(f);
    }
    b.finish()
}
