pub mod factory;
pub mod r#trait;
pub mod types;

pub use factory::FileFactory;
pub use r#trait::DocumentSource;
pub use types::{DocFile, PdfFile, TxtFile};

use crate::error::AnswerResult;
use crate::models::DocumentKind;
use std::path::Path;

/// Extract raw text from `path` using the backend for `kind`.
///
/// Unsupported kinds fail with [`crate::error::QaError::Unsupported`] before
/// any file is opened.
pub async fn extract(path: &Path, kind: DocumentKind) -> AnswerResult<String> {
    let source = FileFactory::create(path.to_path_buf(), kind)?;
    tracing::debug!(path = %path.display(), kind = %kind, "extracting text");
    let text = source.to_text().await?;
    tracing::info!(path = %path.display(), kind = %kind, chars = text.len(), "text extracted");
    Ok(text)
}

/// Extract raw text, deriving the document kind from the file extension
pub async fn extract_path(path: &Path) -> AnswerResult<String> {
    extract(path, DocumentKind::from_path(path)).await
}
