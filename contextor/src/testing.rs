//! In-memory fakes for the external services.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use ai_llm_service::chat::{BoxFuture, ChatCompletion, ChatRequest};
use ai_llm_service::AiLlmError;
use rag_store::{EmbeddingsProvider, RagError, ScoredPayload, VectorIndex};
use serde_json::{Value, json};

use crate::fragment::Fragment;
use crate::source_file::FileStatus;

/// Payload with every required field set.
pub(crate) fn chunk_payload(chunk_type: &str, name: &str) -> Value {
    json!({
        "chunk_type": chunk_type,
        "name": name,
        "code": format!("/* {name} */"),
        "explanation": format!("Explains {name}."),
        "filename": format!("{name}.sas"),
        "line_start": 1,
        "line_end": 9
    })
}

pub(crate) fn fragment(rank: usize, name: &str, full_file: &str) -> Fragment {
    Fragment {
        rank,
        score: 0.5,
        chunk_type: "macro".into(),
        name: name.into(),
        code: format!("%macro {name}; %mend;"),
        explanation: format!("Explains {name}."),
        filename: format!("{name}.sas"),
        line_start: 3,
        line_end: 8,
        full_file_content: full_file.into(),
        file_status: if full_file.is_empty() {
            FileStatus::NotRecorded
        } else {
            FileStatus::Loaded
        },
    }
}

#[derive(Default)]
pub(crate) struct FakeEmbedder {
    pub calls: AtomicUsize,
    fail: bool,
}

impl FakeEmbedder {
    pub(crate) fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

impl EmbeddingsProvider for FakeEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(RagError::Config("embedding service down".into()))
            } else {
                Ok(vec![0.1, 0.2, 0.3])
            }
        })
    }
}

pub(crate) struct FakeIndex {
    hits: Vec<ScoredPayload>,
    requests: Mutex<Vec<u64>>,
}

impl FakeIndex {
    pub(crate) fn new(hits: Vec<ScoredPayload>) -> Self {
        Self {
            hits,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requested_top_k(&self) -> Vec<u64> {
        self.requests.lock().unwrap().clone()
    }
}

impl VectorIndex for FakeIndex {
    fn search<'a>(
        &'a self,
        _vector: Vec<f32>,
        top_k: u64,
        _with_payload: bool,
    ) -> BoxFuture<'a, Result<Vec<ScoredPayload>, RagError>> {
        self.requests.lock().unwrap().push(top_k);
        let hits = self.hits.clone();
        Box::pin(async move { Ok(hits) })
    }
}

/// Echoes a fixed answer and records every request.
pub(crate) struct FakeChat {
    answer: Result<String, ()>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl FakeChat {
    pub(crate) fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn timing_out() -> Self {
        Self {
            answer: Err(()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn last_request(&self) -> ChatRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl ChatCompletion for FakeChat {
    fn complete<'a>(&'a self, req: &'a ChatRequest) -> BoxFuture<'a, Result<String, AiLlmError>> {
        self.requests.lock().unwrap().push(req.clone());
        let answer = self.answer.clone();
        Box::pin(async move {
            answer.map_err(|_| AiLlmError::Timeout(std::time::Duration::from_secs(1)))
        })
    }
}
