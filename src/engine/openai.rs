use crate::config::OpenAiConfig;
use crate::constants::{MISSING_API_KEY_MESSAGE, OPENAI_ERROR_PREFIX, SYSTEM_PROMPT};
use crate::engine::AnswerEngine;
use crate::error::{AnswerResult, QaError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn engine_error(detail: impl std::fmt::Display) -> QaError {
    QaError::EngineFailure(format!("{}: {}", OPENAI_ERROR_PREFIX, detail))
}

/// Remote answer strategy backed by an OpenAI-compatible chat-completion API
pub struct OpenAiEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiEngine {
    /// Create a new engine; the key is held in memory only
    pub fn new(api_key: impl Into<String>, config: &OpenAiConfig) -> AnswerResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(engine_error)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, question: &str, context: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Context: {}\nQuestion: {}", context, question),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl AnswerEngine for OpenAiEngine {
    async fn answer(&self, question: &str, context: &str) -> AnswerResult<String> {
        self.validate()?;

        let request = self.build_request(question, context);
        tracing::debug!(
            model = %self.model,
            context_chars = context.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(engine_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::warn!(status = %status, "chat completion request failed");
            return Err(engine_error(format!("{} {}", status, detail.trim())));
        }

        let completion: ChatResponse = response.json().await.map_err(engine_error)?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| engine_error("response contained no choices"))?
            .message
            .content
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }

    fn validate(&self) -> AnswerResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(QaError::Validation(MISSING_API_KEY_MESSAGE.to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
