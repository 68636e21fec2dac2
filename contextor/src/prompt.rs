//! Prompt template for the answering model.

/// Persona and instruction text parameterized by the language domain.
///
/// # Example
/// ```
/// use contextor::PromptTemplate;
/// let t = PromptTemplate::new("SAS");
/// assert_eq!(t.system(), "You are a helpful SAS programming assistant.");
/// assert!(t.user("ctx", "What does it do?", true).contains("USER QUESTION: What does it do?"));
/// ```
#[derive(Clone, Debug)]
pub struct PromptTemplate<'a> {
    domain: &'a str,
}

impl<'a> PromptTemplate<'a> {
    pub fn new(domain: &'a str) -> Self {
        Self { domain }
    }

    pub fn system(&self) -> String {
        format!("You are a helpful {} programming assistant.", self.domain)
    }

    /// User message embedding the assembled context and the question.
    ///
    /// With `has_context == false` the model is told that nothing was
    /// retrieved so it does not invent references.
    pub fn user(&self, context: &str, query: &str, has_context: bool) -> String {
        let d = self.domain;
        let mut out = format!(
            "You are a {d} programming expert assistant. Answer the user's question based on the following relevant {d} code chunks.\n\n\
             RETRIEVED CONTEXT:\n{context}\n\n\
             USER QUESTION: {query}\n\n\
             Provide a clear, helpful answer based on the context above. Reference specific code examples when relevant."
        );
        if !has_context {
            out.push_str(
                "\nNo relevant code chunks were found. If you answer from general knowledge, say so explicitly.",
            );
        }
        out
    }
}
