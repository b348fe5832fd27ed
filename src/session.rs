use crate::constants::{EMPTY_DOCUMENT_MESSAGE, MISSING_DOCUMENT_MESSAGE, MISSING_QUESTION_MESSAGE};
use crate::engine::AnswerEngine;
use crate::error::{AnswerResult, QaError};
use crate::file;
use crate::models::{NormalizedContext, QaExchange, Transcript};
use crate::normalize::{normalize, NormalizeVariant};
use std::path::Path;

/// State of one question-answering session: the loaded document context,
/// the transcript, and the engine that answers questions
pub struct Session {
    engine: Box<dyn AnswerEngine>,
    variant: NormalizeVariant,
    context: Option<NormalizedContext>,
    transcript: Transcript,
}

impl Session {
    pub fn new(engine: Box<dyn AnswerEngine>, variant: NormalizeVariant) -> Self {
        Self {
            engine,
            variant,
            context: None,
            transcript: Transcript::new(),
        }
    }

    pub fn engine(&self) -> &dyn AnswerEngine {
        self.engine.as_ref()
    }

    pub fn context(&self) -> Option<&NormalizedContext> {
        self.context.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Replace the loaded context; the transcript is kept
    pub fn load(&mut self, context: NormalizedContext) {
        self.context = Some(context);
    }

    /// Extract, normalize and load a document. Returns the context length.
    ///
    /// On failure the previously loaded context stays in place. A document
    /// that normalizes to nothing is rejected.
    pub async fn load_document(&mut self, path: &Path) -> AnswerResult<usize> {
        let raw = file::extract_path(path).await?;
        let context = normalize(&raw, self.variant);

        if context.is_blank() {
            tracing::warn!(path = %path.display(), "document has no usable text");
            return Err(QaError::UnreadableSource(EMPTY_DOCUMENT_MESSAGE.to_string()));
        }

        let len = context.len();
        tracing::info!(path = %path.display(), variant = %self.variant, chars = len, "document loaded");
        self.load(context);
        Ok(len)
    }

    /// Ask a question about the loaded document.
    ///
    /// Validation failures (no document, blank question, engine not ready)
    /// leave the transcript untouched. Every question that reaches the engine
    /// is recorded, with the failure message as the answer if it failed.
    pub async fn ask(&mut self, question: &str) -> AnswerResult<String> {
        let context = match &self.context {
            Some(context) if !context.is_blank() => context,
            _ => return Err(QaError::Validation(MISSING_DOCUMENT_MESSAGE.to_string())),
        };

        if question.trim().is_empty() {
            return Err(QaError::Validation(MISSING_QUESTION_MESSAGE.to_string()));
        }

        self.engine.validate()?;

        let result = self.engine.answer(question, context.as_str()).await;
        let answer_text = match &result {
            Ok(answer) => answer.clone(),
            Err(e) => {
                tracing::warn!(engine = self.engine.name(), error = %e, "answer failed");
                e.to_string()
            }
        };
        self.transcript.push(QaExchange::new(question, answer_text));

        result
    }

    /// Render the transcript as `You: …\nAssistant: …\n` blocks in ask order
    pub fn export(&self) -> String {
        self.transcript.render()
    }

    /// Write the exported transcript to `path` as UTF-8
    pub async fn save(&self, path: &Path) -> AnswerResult<()> {
        tokio::fs::write(path, self.export()).await?;
        tracing::info!(path = %path.display(), exchanges = self.transcript.len(), "transcript saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StaticEngine;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Lets a test keep a handle on the engine after the session owns it
    struct Shared(Arc<StaticEngine>);

    #[async_trait::async_trait]
    impl AnswerEngine for Shared {
        async fn answer(&self, question: &str, context: &str) -> AnswerResult<String> {
            self.0.answer(question, context).await
        }

        fn name(&self) -> &str {
            self.0.name()
        }
    }

    fn session_with(engine: StaticEngine) -> (Session, Arc<StaticEngine>) {
        let engine = Arc::new(engine);
        let session = Session::new(Box::new(Shared(engine.clone())), NormalizeVariant::Strict);
        (session, engine)
    }

    fn loaded(text: &str) -> NormalizedContext {
        normalize(text, NormalizeVariant::Strict)
    }

    #[tokio::test]
    async fn test_ask_without_context_is_validation_failure() {
        let (mut session, engine) = session_with(StaticEngine::answering("blue"));

        let err = session.ask("What color is the sky?").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please load a document.");
        assert!(session.transcript().is_empty());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_ask_with_blank_context_is_validation_failure() {
        let (mut session, _) = session_with(StaticEngine::answering("blue"));
        session.load(loaded("   "));

        let err = session.ask("anything?").await.unwrap_err();
        assert!(err.is_validation());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_ask_with_empty_question_is_validation_failure() {
        let (mut session, engine) = session_with(StaticEngine::answering("blue"));
        session.load(loaded("The sky is blue."));

        let err = session.ask("  \n").await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a question.");
        assert!(session.transcript().is_empty());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_ask_appends_exchange() {
        let (mut session, engine) = session_with(StaticEngine::answering("blue"));
        session.load(loaded("The sky is blue."));

        let answer = session.ask("What color is the sky?").await.unwrap();
        assert_eq!(answer, "blue");
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(
            session.transcript().last(),
            Some(&QaExchange::new("What color is the sky?", "blue"))
        );
        assert_eq!(
            engine.received(),
            vec![("What color is the sky?".to_string(), "the sky is blue".to_string())]
        );
    }

    #[tokio::test]
    async fn test_question_recorded_as_typed() {
        let (mut session, engine) = session_with(StaticEngine::answering("blue"));
        session.load(loaded("The sky is blue."));

        session.ask("  What color is the sky?\n").await.unwrap();
        assert_eq!(session.transcript().last().unwrap().question, "  What color is the sky?\n");
        assert_eq!(engine.received()[0].0, "  What color is the sky?\n");
        assert_eq!(
            session.export(),
            "You:   What color is the sky?\n\nAssistant: blue\n"
        );
    }

    #[tokio::test]
    async fn test_engine_failure_still_recorded() {
        let (mut session, _) = session_with(StaticEngine::failing("Error with OpenAI API: 429 quota"));
        session.load(loaded("The sky is blue."));

        let err = session.ask("What color is the sky?").await.unwrap_err();
        assert!(matches!(err, QaError::EngineFailure(_)));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(
            session.transcript().last().unwrap().answer,
            "Error with OpenAI API: 429 quota"
        );
    }

    #[tokio::test]
    async fn test_engine_validation_failure_not_recorded() {
        let engine = crate::engine::OpenAiEngine::new("", &crate::config::OpenAiConfig::default()).unwrap();
        let mut session = Session::new(Box::new(engine), NormalizeVariant::Strict);
        session.load(loaded("The sky is blue."));

        let err = session.ask("What color is the sky?").await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter your OpenAI API key.");
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_load_keeps_transcript() {
        let (mut session, _) = session_with(StaticEngine::answering("yes"));
        session.load(loaded("first document"));
        session.ask("first?").await.unwrap();

        session.load(loaded("second document"));
        assert_eq!(session.context().unwrap().as_str(), "second document");
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_export_order_and_idempotence() {
        let (mut session, _) = session_with(StaticEngine::answering("ok"));
        session.load(loaded("context"));
        for question in ["one", "two", "three"] {
            session.ask(question).await.unwrap();
        }

        let exported = session.export();
        assert_eq!(
            exported,
            "You: one\nAssistant: ok\nYou: two\nAssistant: ok\nYou: three\nAssistant: ok\n"
        );
        assert_eq!(exported.matches("You: ").count(), 3);
        assert_eq!(session.export(), exported);
    }

    #[tokio::test]
    async fn test_load_document_txt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sky.txt");
        std::fs::write(&path, "The Sky\n\nis BLUE!").unwrap();

        let (mut session, _) = session_with(StaticEngine::answering("blue"));
        let len = session.load_document(&path).await.unwrap();
        assert_eq!(session.context().unwrap().as_str(), "the sky is blue");
        assert_eq!(len, "the sky is blue".len());
    }

    #[tokio::test]
    async fn test_load_document_failure_keeps_previous_context() {
        let temp_dir = TempDir::new().unwrap();
        let (mut session, _) = session_with(StaticEngine::answering("blue"));
        session.load(loaded("previous"));

        let err = session
            .load_document(&temp_dir.path().join("slides.pptx"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file format.");

        let err = session
            .load_document(&temp_dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::UnreadableSource(_)));

        assert_eq!(session.context().unwrap().as_str(), "previous");
    }

    #[tokio::test]
    async fn test_load_document_rejects_empty_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("symbols.txt");
        std::fs::write(&path, "!!! ??? ...").unwrap();

        let (mut session, _) = session_with(StaticEngine::answering("blue"));
        let err = session.load_document(&path).await.unwrap_err();
        assert_eq!(err.to_string(), "Document contains no extractable text.");
        assert!(session.context().is_none());
    }

    #[tokio::test]
    async fn test_save_writes_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transcript.txt");

        let (mut session, _) = session_with(StaticEngine::answering("blue"));
        session.load(loaded("The sky is blue."));
        session.ask("What color is the sky?").await.unwrap();
        session.save(&path).await.unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, "You: What color is the sky?\nAssistant: blue\n");
    }

    #[tokio::test]
    async fn test_save_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("transcript.txt");

        let (session, _) = session_with(StaticEngine::answering("blue"));
        let err = session.save(&path).await.unwrap_err();
        assert!(matches!(err, QaError::Io(_)));
    }
}
