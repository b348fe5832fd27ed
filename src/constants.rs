/// Constants used throughout docquery
/// User-facing messages and remote/local model defaults live here

/// System instruction sent with every chat-completion request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default chat-completion endpoint root (OpenAI-compatible)
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat-completion model
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Output-length budget for a single answer
pub const DEFAULT_MAX_TOKENS: u32 = 5000;

/// Sampling temperature for a single answer
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Environment variable holding the OpenAI credential
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Pre-trained extractive QA model used by the local strategy
pub const DEFAULT_LOCAL_MODEL: &str = "timpal0l/mdeberta-v3-base-squad2";

/// Directory holding converted local model weights, one subdirectory per model
pub const DEFAULT_LOCAL_MODEL_ROOT: &str = "~/.local/share/docquery/models";

/// External converter used for DOC/DOCX files when installed
pub const PANDOC_EXECUTABLE: &str = "pandoc";

/// Greeting shown when an interactive session starts
pub const GREETING: &str =
    "Hello, I'm your Document Assistant. Please upload the document and ask your question.";

// Validation messages
pub const MISSING_API_KEY_MESSAGE: &str = "Please enter your OpenAI API key.";
pub const MISSING_DOCUMENT_MESSAGE: &str = "Please load a document.";
pub const MISSING_QUESTION_MESSAGE: &str = "Please enter a question.";
pub const EMPTY_DOCUMENT_MESSAGE: &str = "Document contains no extractable text.";

// Prefixes for extraction and engine failures
pub const PDF_ERROR_PREFIX: &str = "Error reading PDF";
pub const DOC_ERROR_PREFIX: &str = "Error reading DOC/DOCX";
pub const TXT_ERROR_PREFIX: &str = "Error reading TXT";
pub const OPENAI_ERROR_PREFIX: &str = "Error with OpenAI API";
pub const LOCAL_MODEL_ERROR_PREFIX: &str = "Error with local QA model";

/// Transcript speaker labels
pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "Assistant";
