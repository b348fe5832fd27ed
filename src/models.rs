use crate::constants::{ASSISTANT_LABEL, USER_LABEL};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Document format derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    /// `.doc` and `.docx`
    DocFamily,
    Txt,
    Unsupported,
}

impl DocumentKind {
    /// Map an extension (without the dot, any case) to a document kind
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "doc" | "docx" => DocumentKind::DocFamily,
            "txt" => DocumentKind::Txt,
            _ => DocumentKind::Unsupported,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        utils::get_extension(path)
            .map(|ext| Self::from_extension(&ext))
            .unwrap_or(DocumentKind::Unsupported)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::DocFamily => "DOC/DOCX",
            DocumentKind::Txt => "TXT",
            DocumentKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Canonical document text handed to the answer engine.
///
/// Only [`crate::normalize::normalize`] builds one, so the lower-case,
/// single-space and allow-list invariants always hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedContext(String);

impl NormalizedContext {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the context holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One question and the answer (or rendered failure) it received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExchange {
    pub question: String,
    pub answer: String,
}

impl QaExchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Render as a `You: …\nAssistant: …\n` block
    pub fn render(&self) -> String {
        format!(
            "{}: {}\n{}: {}\n",
            USER_LABEL, self.question, ASSISTANT_LABEL, self.answer
        )
    }
}

/// Append-only record of the exchanges in a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    exchanges: Vec<QaExchange>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, exchange: QaExchange) {
        self.exchanges.push(exchange);
    }

    pub fn exchanges(&self) -> &[QaExchange] {
        &self.exchanges
    }

    pub fn last(&self) -> Option<&QaExchange> {
        self.exchanges.last()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Concatenate every exchange block in ask order
    pub fn render(&self) -> String {
        self.exchanges.iter().map(QaExchange::render).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_document_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("doc"), DocumentKind::DocFamily);
        assert_eq!(DocumentKind::from_extension("DocX"), DocumentKind::DocFamily);
        assert_eq!(DocumentKind::from_extension("txt"), DocumentKind::Txt);
        assert_eq!(DocumentKind::from_extension("md"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_extension(""), DocumentKind::Unsupported);
    }

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(&PathBuf::from("/docs/Report.PDF")),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_path(&PathBuf::from("/docs/README")),
            DocumentKind::Unsupported
        );
        assert_eq!(
            DocumentKind::from_path(&PathBuf::from("/docs/archive.txt.gz")),
            DocumentKind::Unsupported
        );
    }

    #[test]
    fn test_exchange_render() {
        let exchange = QaExchange::new("What color is the sky?", "blue");
        assert_eq!(
            exchange.render(),
            "You: What color is the sky?\nAssistant: blue\n"
        );
    }

    #[test]
    fn test_transcript_render_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(QaExchange::new("first", "one"));
        transcript.push(QaExchange::new("second", "two"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript.render(),
            "You: first\nAssistant: one\nYou: second\nAssistant: two\n"
        );
    }

    #[test]
    fn test_empty_transcript_renders_empty() {
        assert_eq!(Transcript::new().render(), "");
    }

    #[test]
    fn test_transcript_serialization() {
        let mut transcript = Transcript::new();
        transcript.push(QaExchange::new("q", "a"));

        let serialized = serde_json::to_string(&transcript).unwrap();
        let deserialized: Transcript = serde_json::from_str(&serialized).unwrap();
        assert_eq!(transcript, deserialized);
    }
}
