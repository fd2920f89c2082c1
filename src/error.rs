use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockupError {
    #[error("Malformed image input: {0}")]
    MalformedImageInput(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Empty generation result: {0}")]
    EmptyGenerationResult(String),
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
    #[error("Request rejected: {0}")]
    RequestRejected(String),
    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}

impl MockupError {
    /// Text shown to the user when an operation fails.
    pub fn user_message(&self) -> String {
        match self {
            MockupError::MalformedImageInput(msg) => {
                format!("The image could not be read ({}). Please upload a different file.", msg)
            }
            MockupError::ConfigurationError(_) => {
                "API key not configured. Please set GEMINI_API_KEY in your environment or .env file."
                    .to_string()
            }
            MockupError::RateLimited(_) => {
                "API quota exceeded. Please try again later.".to_string()
            }
            MockupError::EmptyGenerationResult(msg) | MockupError::GenerationFailed(msg) => {
                format!(
                    "Failed to generate the mockup: {}. Please try a different prompt or image.",
                    msg
                )
            }
            MockupError::RequestRejected(msg) => msg.clone(),
            MockupError::ImageProcessing(msg) => format!("Image processing failed: {}", msg),
        }
    }

    /// Whether resubmitting the same input may succeed. Retrying is always a user action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MockupError::RateLimited(_)
                | MockupError::GenerationFailed(_)
                | MockupError::EmptyGenerationResult(_)
        )
    }
}

impl From<image::ImageError> for MockupError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => MockupError::MalformedImageInput(e.to_string()),
            image::ImageError::Unsupported(e) => MockupError::MalformedImageInput(e.to_string()),
            other => MockupError::ImageProcessing(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, MockupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = MockupError::GenerationFailed("safety filter".into());
        assert!(err.user_message().contains("safety filter"));
        assert!(err.user_message().contains("try a different"));

        let err = MockupError::ConfigurationError("missing".into());
        assert!(err.user_message().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_retryable() {
        assert!(MockupError::RateLimited("429".into()).is_retryable());
        assert!(!MockupError::ConfigurationError("no key".into()).is_retryable());
        assert!(!MockupError::MalformedImageInput("empty".into()).is_retryable());
    }
}
