use crate::{
    config::UploadLimits,
    error::{MockupError, Result},
    generation,
    logger::Timer,
    models::{
        gemini::{
            Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData,
            Part,
        },
        AspectRatio, GenerationMode, GenerationRequest, ImageBuffer, IndustryCategory,
        OutputCount,
    },
    prompt::ComposedPrompt,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{GeminiTransport, ImageSynthesizer};

#[derive(Clone)]
pub struct ImageClient {
    transport: GeminiTransport,
    model: String,
    limits: UploadLimits,
}

impl ImageClient {
    pub fn new(transport: GeminiTransport, model: String, limits: UploadLimits) -> Self {
        Self {
            transport,
            model,
            limits,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn upload_limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Synthesizes a photographic scene with the logo composited in.
    pub async fn generate_scene(
        &self,
        text: &str,
        industry: IndustryCategory,
        logo: ImageBuffer,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageBuffer> {
        let request = GenerationRequest {
            mode: GenerationMode::SceneSynthesis {
                text: text.to_string(),
                industry,
                logo,
            },
            aspect_ratio,
            output_count: OutputCount::One,
        };
        generation::generate_one(self, &request, &self.limits).await
    }

    /// Replaces (or places) the logo in an existing photograph.
    pub async fn replace_logo(
        &self,
        base: ImageBuffer,
        logo: ImageBuffer,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageBuffer> {
        let request = GenerationRequest {
            mode: GenerationMode::BaseImageReplace { base, logo },
            aspect_ratio,
            output_count: OutputCount::One,
        };
        generation::generate_one(self, &request, &self.limits).await
    }

    /// Fills the transparent region of `cutout` according to `instruction`.
    pub async fn inpaint(&self, cutout: ImageBuffer, instruction: &str) -> Result<ImageBuffer> {
        let (width, height) = crate::codec::dimensions(&cutout)?;
        let request = GenerationRequest::inpaint(cutout, instruction, AspectRatio::new(width, height));
        generation::generate_one(self, &request, &self.limits).await
    }
}

#[async_trait]
impl ImageSynthesizer for ImageClient {
    async fn synthesize(&self, prompt: &ComposedPrompt) -> Result<ImageBuffer> {
        let request = build_request(prompt);

        log::info!(
            "Generating image with model: {} ({} attachments)",
            self.model,
            prompt.attachments.len()
        );
        log::debug!(
            "Attachment payload sizes: {:?}",
            prompt.attachments.iter().map(ImageBuffer::len).collect::<Vec<_>>()
        );

        let timer = Timer::start("image generation");
        let response = self.transport.generate_content(&self.model, &request).await?;
        timer.finish();

        extract_image(response)
    }
}

/// Text part first, then each attachment in order.
pub fn build_request(prompt: &ComposedPrompt) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(prompt.attachments.len() + 1);
    parts.push(Part {
        text: Some(prompt.text.clone()),
        inline_data: None,
    });
    parts.extend(prompt.attachments.iter().map(|image| Part {
        text: None,
        inline_data: Some(InlineData {
            mime_type: image.media_type().to_string(),
            data: image.to_base64(),
        }),
    }));

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["IMAGE".to_string()],
        }),
    }
}

/// Returns the first image part of the response.
pub fn extract_image(response: GenerateContentResponse) -> Result<ImageBuffer> {
    if response.candidates.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| format!("request blocked ({})", reason))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(MockupError::EmptyGenerationResult(reason));
    }

    let mut finish_reason = None;
    for candidate in response.candidates {
        if finish_reason.is_none() {
            finish_reason = candidate.finish_reason.clone();
        }
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        for inline in parts.into_iter().filter_map(|part| part.inline_data) {
            if !inline.mime_type.starts_with("image/") || inline.data.is_empty() {
                continue;
            }
            let bytes = STANDARD.decode(inline.data.as_bytes()).map_err(|e| {
                MockupError::GenerationFailed(format!("Invalid image payload: {}", e))
            })?;
            log::info!("Image generated: {} bytes ({})", bytes.len(), inline.mime_type);
            return Ok(ImageBuffer::new(inline.mime_type, bytes));
        }
    }

    let reason = match finish_reason {
        Some(reason) => format!("the model did not return an image (finish reason: {})", reason),
        None => "the model did not return an image".to_string(),
    };
    Err(MockupError::EmptyGenerationResult(reason))
}
