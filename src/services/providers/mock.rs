//! Mock provider implementation for testing.

use super::{ProviderError, VisionProvider};
use async_trait::async_trait;

#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Echo,
    Fail,
}

/// In-process stand-in for the completion service, used by tests to drive the
/// upload flow without network access.
#[derive(Debug, Clone)]
pub struct MockVisionProvider {
    behavior: MockBehavior,
}

impl MockVisionProvider {
    /// Answers every call with the same text.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Reply(reply.into()),
        }
    }

    /// Answers with a line embedding the question and the image data URL, so
    /// callers can assert exactly what reached the provider.
    pub fn echoing() -> Self {
        Self {
            behavior: MockBehavior::Echo,
        }
    }

    /// Fails every call with an API error.
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Fail,
        }
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn answer(
        &self,
        question: &str,
        image_data_url: &str,
    ) -> Result<String, ProviderError> {
        match &self.behavior {
            MockBehavior::Reply(reply) => Ok(reply.clone()),
            MockBehavior::Echo => Ok(format!(
                "Mock answer for '{}' about {}",
                question, image_data_url
            )),
            MockBehavior::Fail => Err(ProviderError::Api(
                "Mock provider failure".to_string(),
            )),
        }
    }
}
