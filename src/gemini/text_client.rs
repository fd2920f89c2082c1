use crate::{
    error::{MockupError, Result},
    models::gemini::{Content, GenerateContentRequest, GenerateContentResponse, Part},
    prompt,
};
use async_trait::async_trait;

use super::{GeminiTransport, TextRewriter};

#[derive(Clone)]
pub struct TextClient {
    transport: GeminiTransport,
    model: String,
}

impl TextClient {
    pub fn new(transport: GeminiTransport, model: String) -> Self {
        Self { transport, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Cleans up a scene description without changing its subject.
    pub async fn rewrite_description(&self, description: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt::rewrite_prompt(description)),
                    inline_data: None,
                }],
            }],
            generation_config: None,
        };

        log::info!("Rewriting description with model: {}", self.model);

        let response = self
            .transport
            .generate_content(&self.model, &request)
            .await
            .map_err(|e| {
                log::error!("Description rewrite failed: {}", e);
                e
            })?;

        extract_text(response)
    }
}

#[async_trait]
impl TextRewriter for TextClient {
    async fn rewrite(&self, text: &str) -> Result<String> {
        self.rewrite_description(text).await
    }
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(MockupError::GenerationFailed(
            "The model returned no text".into(),
        ));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_trims_and_joins() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "  A white cap " },
                { "text": "with an embroidered logo.\n" }
            ]}}]
        }))
        .unwrap();
        assert_eq!(
            extract_text(response).unwrap(),
            "A white cap with an embroidered logo."
        );
    }

    #[test]
    fn test_extract_text_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(MockupError::GenerationFailed(_))
        ));
    }
}
