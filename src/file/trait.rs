use crate::error::AnswerResult;
use crate::models::DocumentKind;
use async_trait::async_trait;

/// A loaded-on-demand document that can be turned into raw text
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Extract text content from the file.
    ///
    /// Every backend parses the file itself, so an empty PDF or DOCX fails
    /// like any other malformed container.
    async fn to_text(&self) -> AnswerResult<String>;

    /// Get the file path
    fn path(&self) -> &std::path::Path;

    /// Document format handled by this source
    fn kind(&self) -> DocumentKind;
}
