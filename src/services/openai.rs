//! REST client for the OpenAI chat-completion and image-generation endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ServiceError;
use crate::services::provider::{ChatProvider, ImageProvider};
use crate::services::session_manager::Message;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const IMAGE_SIZE: &str = "512x512";

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    /// A missing key is accepted here; requests fail when they are made.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::ExternalService("no OpenAI API key configured".into()))?;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| ServiceError::ExternalService(format!("OpenAI API request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(ServiceError::ExternalService(format!(
                "OpenAI API returned {status}: {body_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| ServiceError::ExternalService(format!("Failed to parse OpenAI response: {err}")))
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn complete(&self, history: &[Message]) -> Result<String, ServiceError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: history,
            max_tokens: self.max_tokens,
        };
        let parsed: ChatCompletionResponse = self.post_json("/chat/completions", &request).await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::ExternalService("OpenAI response contained no choices".into()))
    }
}

#[async_trait]
impl ImageProvider for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = ImageGenerationRequest { prompt, n: 1, size: IMAGE_SIZE };
        let parsed: ImageGenerationResponse = self.post_json("/images/generations", &request).await?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| ServiceError::ExternalService("OpenAI response contained no image URL".into()))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}
