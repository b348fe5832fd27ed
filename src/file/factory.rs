use crate::error::{AnswerResult, QaError};
use crate::file::types::{DocFile, PdfFile, TxtFile};
use crate::file::DocumentSource;
use crate::models::DocumentKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Factory for creating DocumentSource instances based on document kind
pub struct FileFactory;

impl FileFactory {
    /// Create a DocumentSource from a path, deriving the kind from its extension
    pub fn create_from_path(path: PathBuf) -> AnswerResult<Arc<dyn DocumentSource>> {
        let kind = DocumentKind::from_path(&path);
        Self::create(path, kind)
    }

    /// Create a DocumentSource for an explicit kind
    pub fn create(path: PathBuf, kind: DocumentKind) -> AnswerResult<Arc<dyn DocumentSource>> {
        match kind {
            DocumentKind::Pdf => Ok(Arc::new(PdfFile::new(path))),
            DocumentKind::DocFamily => Ok(Arc::new(DocFile::new(path))),
            DocumentKind::Txt => Ok(Arc::new(TxtFile::new(path))),
            DocumentKind::Unsupported => Err(QaError::Unsupported),
        }
    }
}
