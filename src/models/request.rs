use super::{AspectRatio, ImageBuffer, IndustryCategory, InputMode, OutputCount};
use crate::error::{MockupError, Result};

/// Mode-specific inputs of one generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationMode {
    SceneSynthesis {
        text: String,
        industry: IndustryCategory,
        logo: ImageBuffer,
    },
    BaseImageReplace {
        base: ImageBuffer,
        logo: ImageBuffer,
    },
    Inpaint {
        /// Source image with the region to regenerate made transparent.
        image: ImageBuffer,
        instruction: String,
    },
}

impl GenerationMode {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationMode::SceneSynthesis { .. } => "scene-synthesis",
            GenerationMode::BaseImageReplace { .. } => "base-image-replace",
            GenerationMode::Inpaint { .. } => "inpaint",
        }
    }
}

/// A fully validated request. Built fresh per submit and never modified after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub aspect_ratio: AspectRatio,
    pub output_count: OutputCount,
}

impl GenerationRequest {
    pub fn inpaint(
        image: ImageBuffer,
        instruction: impl Into<String>,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            mode: GenerationMode::Inpaint {
                image,
                instruction: instruction.into(),
            },
            aspect_ratio,
            output_count: OutputCount::One,
        }
    }
}

/// The request form as the user fills it in. Fields are optional here and
/// checked by [`MockupDraft::build`].
#[derive(Debug, Clone, Default)]
pub struct MockupDraft {
    pub input_mode: InputMode,
    pub description: String,
    pub category: IndustryCategory,
    pub logo: Option<ImageBuffer>,
    pub base_image: Option<ImageBuffer>,
    pub aspect_ratio: AspectRatio,
    pub output_count: OutputCount,
}

impl MockupDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: IndustryCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_logo(mut self, logo: ImageBuffer) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_base_image(mut self, base: ImageBuffer) -> Self {
        self.base_image = Some(base);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn with_output_count(mut self, count: OutputCount) -> Self {
        self.output_count = count;
        self
    }

    /// Whether the submit control should be enabled for the current mode.
    pub fn is_complete(&self) -> bool {
        self.build().is_ok()
    }

    pub fn build(&self) -> Result<GenerationRequest> {
        let logo = required_image(self.logo.as_ref(), "logo")?;

        let mode = match self.input_mode {
            InputMode::Description => {
                let text = self.description.trim();
                if text.is_empty() {
                    return Err(MockupError::RequestRejected(
                        "A scene description is required".into(),
                    ));
                }
                GenerationMode::SceneSynthesis {
                    text: text.to_string(),
                    industry: self.category,
                    logo,
                }
            }
            InputMode::Image => GenerationMode::BaseImageReplace {
                base: required_image(self.base_image.as_ref(), "base image")?,
                logo,
            },
        };

        Ok(GenerationRequest {
            mode,
            aspect_ratio: self.aspect_ratio,
            output_count: self.output_count,
        })
    }
}

fn required_image(image: Option<&ImageBuffer>, what: &str) -> Result<ImageBuffer> {
    match image {
        None => Err(MockupError::RequestRejected(format!("A {} is required", what))),
        Some(image) if image.is_empty() => Err(MockupError::MalformedImageInput(format!(
            "The {} is empty",
            what
        ))),
        Some(image) => Ok(image.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo() -> ImageBuffer {
        ImageBuffer::new("image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_description_mode_requires_text_and_logo() {
        let draft = MockupDraft::new().with_logo(logo());
        assert!(matches!(draft.build(), Err(MockupError::RequestRejected(_))));

        let draft = MockupDraft::new().with_description("a white cap");
        assert!(matches!(draft.build(), Err(MockupError::RequestRejected(_))));
        assert!(!draft.is_complete());

        let request = MockupDraft::new()
            .with_description("  a white cap ")
            .with_category(IndustryCategory::TechSaas)
            .with_logo(logo())
            .build()
            .unwrap();
        match request.mode {
            GenerationMode::SceneSynthesis { text, industry, .. } => {
                assert_eq!(text, "a white cap");
                assert_eq!(industry, IndustryCategory::TechSaas);
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_image_mode_requires_base_and_logo() {
        let draft = MockupDraft::new()
            .with_input_mode(InputMode::Image)
            .with_logo(logo());
        assert!(draft.build().is_err());

        let request = draft
            .with_base_image(ImageBuffer::new("image/jpeg", vec![9]))
            .build()
            .unwrap();
        assert_eq!(request.mode.name(), "base-image-replace");
    }

    #[test]
    fn test_empty_logo_is_malformed() {
        let draft = MockupDraft::new()
            .with_description("mug")
            .with_logo(ImageBuffer::new("image/png", Vec::new()));
        assert!(matches!(draft.build(), Err(MockupError::MalformedImageInput(_))));
    }
}
