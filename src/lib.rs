pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod file;
pub mod models;
pub mod normalize;
pub mod session;
pub mod utils;

pub use config::Config;
pub use engine::AnswerEngine;
pub use error::{AnswerResult, QaError};
pub use file::{extract, extract_path, DocumentSource};
pub use models::{DocumentKind, NormalizedContext, QaExchange, Transcript};
pub use normalize::{normalize, NormalizeVariant};
pub use session::Session;
