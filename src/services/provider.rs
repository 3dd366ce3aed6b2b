//! Seams to the AI backends.
//!
//! The live implementation is [`OpenAiClient`](super::openai::OpenAiClient);
//! [`PlaceholderProvider`] answers locally when no integration is wired up.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::services::session_manager::Message;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/512x512.png?text=Generated+Image";
pub const ECHO_PREFIX: &str = "Echo: ";

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Produces the assistant's reply to `history`, whose last entry is the
    /// user turn being answered.
    async fn complete(&self, history: &[Message]) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Returns the URL of one image generated for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Echoes chat input and hands out a fixed image.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

#[async_trait]
impl ChatProvider for PlaceholderProvider {
    async fn complete(&self, history: &[Message]) -> Result<String, ServiceError> {
        let last = history.last().map(|m| m.content.as_str()).unwrap_or_default();
        Ok(format!("{ECHO_PREFIX}{last}"))
    }
}

#[async_trait]
impl ImageProvider for PlaceholderProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Ok(PLACEHOLDER_IMAGE_URL.to_string())
    }
}
