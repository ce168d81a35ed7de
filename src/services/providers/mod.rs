//! Abstraction over the multimodal completion backend.

pub mod mock;
pub mod openai;

pub use mock::MockVisionProvider;
pub use openai::{OpenAiConfig, OpenAiVisionProvider};

use async_trait::async_trait;
use thiserror::Error;

/// Failures a provider call can surface. The upload handler collapses all of
/// them into one generic client-facing error; the variants exist for logs and
/// tests.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Rate limited by provider")]
    RateLimited,
}

/// A backend able to answer a question about a single image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Return the model's textual answer for `question` about the image carried
    /// in `image_data_url`. A successful answer is never empty.
    async fn answer(
        &self,
        question: &str,
        image_data_url: &str,
    ) -> Result<String, ProviderError>;
}
