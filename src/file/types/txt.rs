use crate::constants::TXT_ERROR_PREFIX;
use crate::error::{AnswerResult, QaError};
use crate::file::DocumentSource;
use crate::models::DocumentKind;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Plain text file handler
pub struct TxtFile {
    path: PathBuf,
}

impl TxtFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DocumentSource for TxtFile {
    async fn to_text(&self) -> AnswerResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| QaError::UnreadableSource(format!("{}: {}", TXT_ERROR_PREFIX, e)))
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Txt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_txt_file_extraction() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "The sky is blue.\nGrass is green.").unwrap();

        let txt_file = TxtFile::new(path.clone());
        let text = txt_file.to_text().await.unwrap();
        assert_eq!(text, "The sky is blue.\nGrass is green.");
        assert_eq!(txt_file.path(), path);
        assert_eq!(txt_file.kind(), DocumentKind::Txt);
    }

    #[tokio::test]
    async fn test_txt_file_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let text = TxtFile::new(path).to_text().await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_txt_file_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.txt");
        std::fs::write(&path, [0x66, 0x6f, 0xff, 0xfe, 0x6f]).unwrap();

        let err = TxtFile::new(path).to_text().await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnreadableSource);
        assert!(err.to_string().starts_with("Error reading TXT: "));
    }

    #[tokio::test]
    async fn test_txt_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");

        let err = TxtFile::new(path).to_text().await.unwrap_err();
        assert!(matches!(err, QaError::UnreadableSource(_)));
    }
}
