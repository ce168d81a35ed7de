//! OpenAI chat-completions provider implementation.
//!
//! Sends one user message carrying the question text followed by the image as
//! a data URL, and extracts the first choice's text.

use super::{ProviderError, VisionProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI API base URL.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

/// OpenAI vision provider.
pub struct OpenAiVisionProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiVisionProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        // No explicit timeout: a call runs to completion or failure.
        let client = Client::new();

        Self { config, client }
    }

    /// Build the chat completion request for one question about one image.
    fn build_request(&self, question: &str, image_data_url: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: question.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url.to_string(),
                        },
                    },
                ],
            }],
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAiVisionProvider {
    async fn answer(
        &self,
        question: &str,
        image_data_url: &str,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(question, image_data_url);
        let url = format!("{}/chat/completions", OPENAI_API_BASE);

        tracing::debug!(
            model = %self.config.model,
            question_len = question.len(),
            image_url_len = image_data_url.len(),
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::Api(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        // An answer reported as success must carry text.
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("completion carried no text".to_string())
            })
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
