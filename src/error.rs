use thiserror::Error;

/// Result type returned by every fallible pipeline operation
pub type AnswerResult<T> = std::result::Result<T, QaError>;

/// Errors produced while loading documents or answering questions
#[derive(Debug, Error)]
pub enum QaError {
    /// The file is missing, unreadable or corrupt
    #[error("{0}")]
    UnreadableSource(String),

    /// The extension is not one of the supported document formats
    #[error("Unsupported file format.")]
    Unsupported,

    /// A format-to-text conversion failed
    #[error("{0}")]
    ConversionFailure(String),

    /// The answer engine could not produce an answer
    #[error("{0}")]
    EngineFailure(String),

    /// Input was missing or invalid (credential, document, question)
    #[error("{0}")]
    Validation(String),

    #[error("Error saving file: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure category used when reporting errors to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UnreadableSource,
    ConversionFailure,
    EngineFailure,
    ValidationFailure,
}

impl QaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QaError::UnreadableSource(_) | QaError::Unsupported | QaError::Io(_) => {
                ErrorCategory::UnreadableSource
            }
            QaError::ConversionFailure(_) => ErrorCategory::ConversionFailure,
            QaError::EngineFailure(_) => ErrorCategory::EngineFailure,
            QaError::Validation(_) => ErrorCategory::ValidationFailure,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::ValidationFailure
    }
}
