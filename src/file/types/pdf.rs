use crate::constants::PDF_ERROR_PREFIX;
use crate::error::{AnswerResult, QaError};
use crate::file::DocumentSource;
use crate::models::DocumentKind;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// PDF file handler
pub struct PdfFile {
    path: PathBuf,
}

impl PdfFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Page-by-page extraction with lopdf, falling back to pdf-extract when
    /// no page produced any text
    fn extract_blocking(path: &Path) -> AnswerResult<String> {
        use lopdf::Document;

        let doc = Document::load(path).map_err(|e| {
            QaError::UnreadableSource(format!("{}: {}", PDF_ERROR_PREFIX, e))
        })?;

        let mut text_content = String::new();
        let pages = doc.get_pages();
        // BTreeMap keys iterate in page-number order
        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => text_content.push_str(&page_text),
                Err(e) => {
                    tracing::debug!(page = page_num, error = %e, "PDF page yielded no text");
                }
            }
        }

        if !text_content.trim().is_empty() {
            return Ok(text_content);
        }

        tracing::warn!(
            path = %path.display(),
            pages = pages.len(),
            "lopdf extracted no text, trying pdf-extract"
        );
        match pdf_extract::extract_text(path) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "pdf-extract fallback failed");
                Ok(String::new())
            }
        }
    }
}

#[async_trait]
impl DocumentSource for PdfFile {
    async fn to_text(&self) -> AnswerResult<String> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&path))
            .await
            .map_err(|e| QaError::UnreadableSource(format!("{}: {}", PDF_ERROR_PREFIX, e)))?
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }
}
