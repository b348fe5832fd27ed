use crate::constants::{DOC_ERROR_PREFIX, PANDOC_EXECUTABLE};
use crate::error::{AnswerResult, QaError};
use crate::file::DocumentSource;
use crate::models::DocumentKind;
use crate::utils;
use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

fn conversion_error(detail: impl std::fmt::Display) -> QaError {
    QaError::ConversionFailure(format!("{}: {}", DOC_ERROR_PREFIX, detail))
}

/// DOC/DOCX file handler.
/// Converts with pandoc when it is installed; otherwise reads `.docx`
/// containers directly. Legacy `.doc` files need pandoc.
pub struct DocFile {
    path: PathBuf,
    /// `None` probes for pandoc when text is extracted
    use_pandoc: Option<bool>,
}

impl DocFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            use_pandoc: None,
        }
    }

    /// Always use the built-in DOCX reader, even if pandoc is available
    pub fn builtin(path: PathBuf) -> Self {
        Self {
            path,
            use_pandoc: Some(false),
        }
    }

    fn is_docx(&self) -> bool {
        utils::get_extension(&self.path).as_deref() == Some("docx")
    }

    /// Convert to plain text with pandoc
    fn extract_with_pandoc(path: &Path) -> AnswerResult<String> {
        let output = Command::new(PANDOC_EXECUTABLE)
            .arg("-t")
            .arg("plain")
            .arg(path)
            .output()
            .map_err(|e| conversion_error(format!("failed to execute pandoc: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(conversion_error(format!("pandoc failed: {}", stderr.trim())));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| conversion_error("pandoc returned invalid UTF-8"))
    }

    /// Read `word/document.xml` out of the DOCX zip container
    fn extract_docx(path: &Path) -> AnswerResult<String> {
        use std::fs::File;
        use zip::ZipArchive;

        let file = File::open(path).map_err(conversion_error)?;
        let mut archive = ZipArchive::new(file).map_err(conversion_error)?;
        let mut document = archive
            .by_name("word/document.xml")
            .map_err(|e| conversion_error(format!("word/document.xml: {}", e)))?;

        let mut xml = String::new();
        document.read_to_string(&mut xml).map_err(conversion_error)?;

        docx_xml_to_text(&xml)
    }
}

/// Flatten WordprocessingML body text.
/// Text runs are kept in order; paragraphs and breaks become `\n`, tabs `\t`.
pub(crate) fn docx_xml_to_text(xml: &str) -> AnswerResult<String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(conversion_error)? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                let unescaped = t.unescape().map_err(conversion_error)?;
                text.push_str(&unescaped);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[async_trait]
impl DocumentSource for DocFile {
    async fn to_text(&self) -> AnswerResult<String> {
        let path = self.path.clone();
        let use_pandoc = self.use_pandoc;
        let is_docx = self.is_docx();

        tokio::task::spawn_blocking(move || {
            let use_pandoc =
                use_pandoc.unwrap_or_else(|| utils::check_command(PANDOC_EXECUTABLE));
            if use_pandoc {
                tracing::debug!(path = %path.display(), "converting with pandoc");
                DocFile::extract_with_pandoc(&path)
            } else if is_docx {
                tracing::debug!(path = %path.display(), "pandoc not found, reading DOCX directly");
                DocFile::extract_docx(&path)
            } else {
                Err(conversion_error(
                    "pandoc is required to convert .doc files (https://pandoc.org/installing.html)",
                ))
            }
        })
        .await
        .map_err(conversion_error)?
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::DocFamily
    }
}
