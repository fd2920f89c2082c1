pub mod image_client;
pub mod text_client;
pub mod traits;

use crate::{
    config::{Config, GeminiConfig, UploadLimits},
    error::{MockupError, Result},
    models::gemini::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
};
use reqwest::{Client, StatusCode};

pub use image_client::ImageClient;
pub use text_client::TextClient;
pub use traits::{ImageSynthesizer, TextRewriter};

/// Authenticated access to the `generateContent` endpoint, shared by the image
/// and text clients.
#[derive(Clone)]
pub struct GeminiTransport {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MockupError::ConfigurationError("API_KEY is not set".into()))?;

        Ok(Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request to {} failed: {}", model, e);
                MockupError::GenerationFailed(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MockupError::GenerationFailed(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::error!("Gemini returned {} for model {}: {}", status, model, body);
            return Err(classify_failure(Some(status), &error_message(&body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            MockupError::GenerationFailed(format!("Unreadable response from service: {}", e))
        })
    }
}

/// Pulls the human-readable message out of an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let mut message = envelope.error.message;
            if let Some(status) = envelope.error.status {
                if !message.contains(&status) {
                    message = format!("{} ({})", message, status);
                }
            }
            message
        }
        Err(_) => body.trim().to_string(),
    }
}

/// Maps an upstream failure onto the user-facing error categories.
pub fn classify_failure(status: Option<StatusCode>, message: &str) -> MockupError {
    let lowered = message.to_ascii_lowercase();

    let credential = matches!(
        status,
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
    ) || lowered.contains("api_key")
        || lowered.contains("api key");
    if credential {
        return MockupError::ConfigurationError(message.to_string());
    }

    let limited = status == Some(StatusCode::TOO_MANY_REQUESTS)
        || lowered.contains("quota")
        || lowered.contains("rate limit")
        || lowered.contains("resource_exhausted");
    if limited {
        return MockupError::RateLimited(message.to_string());
    }

    let message = if message.is_empty() {
        status
            .map(|s| format!("HTTP {}", s))
            .unwrap_or_else(|| "Unknown error".to_string())
    } else {
        message.to_string()
    };
    MockupError::GenerationFailed(message)
}

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
    text_client: TextClient,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = GeminiTransport::new(&config.gemini)?;

        log::info!(
            "Gemini client ready (image model: {}, text model: {})",
            config.gemini.image_model,
            config.gemini.text_model
        );

        Ok(Self {
            image_client: ImageClient::new(
                transport.clone(),
                config.gemini.image_model.clone(),
                config.upload,
            ),
            text_client: TextClient::new(transport, config.gemini.text_model.clone()),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env())
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn upload_limits(&self) -> &UploadLimits {
        self.image_client.upload_limits()
    }
}
