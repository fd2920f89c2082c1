pub mod codec;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod logger;
pub mod mask;
pub mod models;
pub mod prompt;
pub mod session;

pub use config::{Config, GeminiConfig, UploadLimits};
pub use error::{MockupError, Result};
pub use gemini::{GeminiClient, ImageClient, ImageSynthesizer, TextClient, TextRewriter};
pub use mask::{EditorState, MaskEditor, Point};
pub use models::*;
pub use prompt::ComposedPrompt;
pub use session::{EditTarget, Session, Ticket};
