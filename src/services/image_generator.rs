use crate::error::ServiceError;
use crate::services::provider::ImageProvider;

pub const EMPTY_PROMPT_WARNING: &str = "Please enter a prompt.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub caption: String,
}

/// Asks the provider for one image. Empty prompts never reach the provider.
pub async fn generate_image(prompt: &str, provider: &dyn ImageProvider) -> Result<GeneratedImage, ServiceError> {
    if prompt.is_empty() {
        return Err(ServiceError::Validation(EMPTY_PROMPT_WARNING.into()));
    }

    let url = provider.generate(prompt).await?;
    Ok(GeneratedImage { url, caption: prompt.to_string() })
}
