pub mod category;
pub mod common;
pub mod gemini;
pub mod image;
pub mod request;
pub mod result;

pub use category::*;
pub use common::*;
pub use self::image::*;
pub use request::*;
pub use result::*;
