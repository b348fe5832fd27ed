use crate::engine::AnswerEngine;
use crate::error::{AnswerResult, QaError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted answer strategy: always returns the same answer or failure.
/// Records every question it receives.
pub struct StaticEngine {
    reply: Result<String, String>,
    calls: AtomicUsize,
    questions: Mutex<Vec<(String, String)>>,
}

impl StaticEngine {
    /// Engine that answers every question with `answer`
    pub fn answering(answer: impl Into<String>) -> Self {
        Self::with_reply(Ok(answer.into()))
    }

    /// Engine that fails every question with an engine failure carrying `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_reply(Err(reason.into()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Number of answer calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// `(question, context)` pairs received, in order
    pub fn received(&self) -> Vec<(String, String)> {
        self.questions
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl AnswerEngine for StaticEngine {
    async fn answer(&self, question: &str, context: &str) -> AnswerResult<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut questions) = self.questions.lock() {
            questions.push((question.to_string(), context.to_string()));
        }

        match &self.reply {
            Ok(answer) => Ok(answer.clone()),
            Err(reason) => Err(QaError::EngineFailure(reason.clone())),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}
