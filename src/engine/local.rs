use crate::config::LocalConfig;
use crate::constants::LOCAL_MODEL_ERROR_PREFIX;
use crate::engine::AnswerEngine;
use crate::error::{AnswerResult, QaError};
use once_cell::sync::OnceCell;
use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::question_answering::{
    QaInput, QuestionAnsweringConfig, QuestionAnsweringModel,
};
use rust_bert::resources::LocalResource;
use std::path::PathBuf;
use std::sync::Mutex;

/// Loaded once per process, on first use, and never torn down
static QA_MODEL: OnceCell<Mutex<QuestionAnsweringModel>> = OnceCell::new();

fn engine_error(detail: impl std::fmt::Display) -> QaError {
    QaError::EngineFailure(format!("{}: {}", LOCAL_MODEL_ERROR_PREFIX, detail))
}

/// Local answer strategy: extractive QA with a pre-trained DeBERTa-v2 model
pub struct LocalQaEngine {
    model_name: String,
    model_dir: PathBuf,
}

impl LocalQaEngine {
    /// Create a new local QA engine; weights are not loaded until the first answer
    pub fn new(config: &LocalConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            model_dir: config.model_dir(),
        }
    }

    /// Check if the converted weights are present
    pub fn model_exists(&self) -> bool {
        self.model_dir.join("rust_model.ot").exists()
    }

    fn load_model(model_dir: &std::path::Path) -> AnswerResult<QuestionAnsweringModel> {
        let resource = |name: &str| LocalResource::from(model_dir.join(name));
        let config = QuestionAnsweringConfig::new(
            ModelType::DebertaV2,
            ModelResource::Torch(Box::new(resource("rust_model.ot"))),
            resource("config.json"),
            resource("spm.model"),
            None::<LocalResource>,
            false,
            false,
            None::<bool>,
        );
        QuestionAnsweringModel::new(config).map_err(engine_error)
    }

    fn model(&self) -> AnswerResult<&'static Mutex<QuestionAnsweringModel>> {
        QA_MODEL.get_or_try_init(|| {
            if !self.model_exists() {
                return Err(engine_error(format!(
                    "model weights not found in {}",
                    self.model_dir.display()
                )));
            }
            tracing::info!(
                model = %self.model_name,
                dir = %self.model_dir.display(),
                "loading local QA model"
            );
            Self::load_model(&self.model_dir).map(Mutex::new)
        })
    }
}

#[async_trait::async_trait]
impl AnswerEngine for LocalQaEngine {
    async fn answer(&self, question: &str, context: &str) -> AnswerResult<String> {
        let model_name = self.model_name.clone();
        let model_dir = self.model_dir.clone();
        let input = QaInput {
            question: question.to_string(),
            context: context.to_string(),
        };

        tokio::task::spawn_blocking(move || {
            let engine = LocalQaEngine {
                model_name,
                model_dir,
            };
            let model = engine.model()?;
            let model = model
                .lock()
                .map_err(|_| engine_error("model lock poisoned"))?;

            let answers = model.predict(&[input], 1, 32);
            let best = answers
                .into_iter()
                .next()
                .and_then(|candidates| candidates.into_iter().next())
                .ok_or_else(|| engine_error("model returned no answer"))?;

            tracing::debug!(score = best.score, "local QA answer");
            Ok(best.answer)
        })
        .await
        .map_err(engine_error)?
    }

    fn name(&self) -> &str {
        "local"
    }
}
