use crate::error::AnswerResult;

/// Capability shared by every answer strategy: answer a question given context
#[async_trait::async_trait]
pub trait AnswerEngine: Send + Sync {
    /// Answer `question` using `context` as grounding.
    /// One atomic request; no retries, no partial answers.
    async fn answer(&self, question: &str, context: &str) -> AnswerResult<String>;

    /// Pre-flight check run before a question is accepted (credentials, setup)
    fn validate(&self) -> AnswerResult<()> {
        Ok(())
    }

    /// Short name used in logs
    fn name(&self) -> &str;
}
