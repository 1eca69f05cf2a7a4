use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::GeminiConfig;

/// Typed failures of the generative backend. Callers surface a fixed
/// apology string and log the detail; no retry is performed.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("model unavailable")]
    Unavailable,

    #[error("model returned no usable candidate")]
    EmptyResponse,

    #[error("unexpected model failure: {0}")]
    Unexpected(String),
}

/// Adapter boundary to the external generative-AI service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    async fn generate_with_image(
        &self,
        prompt: &str,
        mime: &str,
        image: &[u8],
    ) -> Result<String, AiError>;
}

/// Gemini via its OpenAI-compatible endpoint. Constructed `Unconfigured`
/// when no API key is present; that mode fails every call with
/// `AiError::Unavailable` without touching the network.
pub enum GeminiService {
    Live {
        client: Client,
        config: GeminiConfig,
        api_key: String,
    },
    Unconfigured,
}

// Minimal OpenAI-compatible request (v1beta/openai endpoint)
#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
}

#[derive(Serialize)]
struct RequestMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// Response structures
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Self {
        match config.api_key.clone() {
            Some(api_key) if !api_key.is_empty() => {
                let client = Client::builder()
                    .timeout(Duration::from_secs(config.timeout_seconds))
                    .build()
                    .unwrap_or_else(|_| Client::new());
                Self::Live {
                    client,
                    config,
                    api_key,
                }
            }
            _ => {
                warn!("GEMINI_API_KEY not set, chat generation is disabled");
                Self::Unconfigured
            }
        }
    }

    async fn complete(&self, content: MessageContent) -> Result<String, AiError> {
        let (client, config, api_key) = match self {
            Self::Live {
                client,
                config,
                api_key,
            } => (client, config, api_key),
            Self::Unconfigured => return Err(AiError::Unavailable),
        };

        let request = ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![RequestMessage {
                role: "user",
                content,
            }],
        };

        debug!("Calling Gemini model {}", config.model);

        let response = client
            .post(format!("{}/chat/completions", config.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini network error: {}", e);
                AiError::Unavailable
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error ({}): {}", status, body);
            return Err(AiError::Unavailable);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Unexpected(format!("failed to parse response: {}", e)))?;

        match body.choices.first().and_then(|c| c.message.content.clone()) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AiError::EmptyResponse),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiService {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.complete(MessageContent::Text(prompt.to_string())).await
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        mime: &str,
        image: &[u8],
    ) -> Result<String, AiError> {
        let data_url = format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(image)
        );

        self.complete(MessageContent::Parts(vec![
            ContentPart::Text {
                text: prompt.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl { url: data_url },
            },
        ]))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_service_is_unavailable() {
        let service = GeminiService::new(GeminiConfig {
            api_key: None,
            ..GeminiConfig::default()
        });

        assert!(matches!(service, GeminiService::Unconfigured));
        assert!(matches!(
            service.generate("hello").await,
            Err(AiError::Unavailable)
        ));
        assert!(matches!(
            service.generate_with_image("hello", "image/png", &[1, 2, 3]).await,
            Err(AiError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_empty_api_key_counts_as_unconfigured() {
        let service = GeminiService::new(GeminiConfig {
            api_key: Some(String::new()),
            ..GeminiConfig::default()
        });

        assert!(matches!(service, GeminiService::Unconfigured));
    }
}
