use crate::{error::Result, models::ImageBuffer, prompt::ComposedPrompt};
use async_trait::async_trait;

/// The generation service seen as an opaque function: prompt and images in,
/// one image out.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &ComposedPrompt) -> Result<ImageBuffer>;
}

/// Free-text cleanup used by the description "rewrite" action.
#[async_trait]
pub trait TextRewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String>;
}
