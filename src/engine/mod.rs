pub mod fixed;
pub mod openai;
pub mod r#trait;

#[cfg(feature = "local-qa")]
pub mod local;

pub use fixed::StaticEngine;
pub use openai::OpenAiEngine;
pub use r#trait::AnswerEngine;

#[cfg(feature = "local-qa")]
pub use local::LocalQaEngine;

use crate::config::{Config, EngineStrategy};
use crate::error::AnswerResult;

#[cfg(not(feature = "local-qa"))]
pub struct LocalQaEngine;

#[cfg(not(feature = "local-qa"))]
impl LocalQaEngine {
    pub fn new(_config: &crate::config::LocalConfig) -> Self {
        Self
    }

    pub fn model_exists(&self) -> bool {
        false
    }
}

#[cfg(not(feature = "local-qa"))]
#[async_trait::async_trait]
impl AnswerEngine for LocalQaEngine {
    async fn answer(&self, _question: &str, _context: &str) -> AnswerResult<String> {
        Err(crate::error::QaError::EngineFailure(format!(
            "{}: local QA support is not enabled. Compile with --features local-qa to use the local model.",
            crate::constants::LOCAL_MODEL_ERROR_PREFIX
        )))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Build the answer strategy selected in the configuration.
/// `api_key` is only used by the remote strategy.
pub fn from_config(config: &Config, api_key: Option<&str>) -> AnswerResult<Box<dyn AnswerEngine>> {
    let engine: Box<dyn AnswerEngine> = match config.engine.strategy {
        EngineStrategy::Remote => Box::new(OpenAiEngine::new(
            api_key.unwrap_or_default(),
            &config.openai,
        )?),
        EngineStrategy::Local => Box::new(LocalQaEngine::new(&config.local)),
    };
    tracing::debug!(engine = engine.name(), "answer engine selected");
    Ok(engine)
}
