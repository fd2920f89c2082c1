//! Conversions between data URLs, encoded buffers and decoded pixels.
//!
//! `constrain` bounds the payload sent to the generation service. A downscaled
//! opaque image is re-encoded as JPEG at [`UploadLimits::jpeg_quality`]; the
//! default of 85 keeps payloads small but softens fine logo detail (thin
//! strokes, small lettering), which the fidelity rules in the prompts depend
//! on. Images with an alpha channel are re-encoded as PNG so transparent
//! regions survive.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::{
    config::UploadLimits,
    error::{MockupError, Result},
    models::ImageBuffer,
};

/// Media type assumed when a data URL header does not declare one.
pub const FALLBACK_MEDIA_TYPE: &str = "image/png";

/// Splits a `data:<media type>;base64,<payload>` URL into a buffer.
pub fn decode(data_url: &str) -> Result<ImageBuffer> {
    let data_url = data_url.trim();
    if data_url.is_empty() {
        return Err(MockupError::MalformedImageInput("Empty data URL".into()));
    }

    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| MockupError::MalformedImageInput("Invalid data URL format".into()))?;
    if payload.contains(',') {
        return Err(MockupError::MalformedImageInput(
            "Invalid data URL format".into(),
        ));
    }
    if payload.is_empty() {
        return Err(MockupError::MalformedImageInput("Empty image data".into()));
    }

    let header = header.strip_prefix("data:").ok_or_else(|| {
        MockupError::MalformedImageInput("Data URL must start with 'data:'".into())
    })?;
    let mut params = header.split(';').map(str::trim);
    let media_type = params
        .next()
        .filter(|mime| !mime.is_empty())
        .unwrap_or(FALLBACK_MEDIA_TYPE);
    if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
        return Err(MockupError::MalformedImageInput(
            "Data URL must be base64 encoded".into(),
        ));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| MockupError::MalformedImageInput(format!("Invalid base64 payload: {}", e)))?;
    if bytes.is_empty() {
        return Err(MockupError::MalformedImageInput("Empty image data".into()));
    }

    Ok(ImageBuffer::new(media_type, bytes))
}

/// Renders a buffer as a base64 data URL.
pub fn encode(buffer: &ImageBuffer) -> String {
    format!("data:{};base64,{}", buffer.media_type(), buffer.to_base64())
}

impl ImageBuffer {
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        decode(data_url)
    }

    pub fn to_data_url(&self) -> String {
        encode(self)
    }

    /// Base64 of the payload without the data URL header.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes())
    }
}

/// Wraps raw file bytes, taking the media type from the format signature.
pub fn from_file_bytes(bytes: Vec<u8>) -> Result<ImageBuffer> {
    if bytes.is_empty() {
        return Err(MockupError::MalformedImageInput("Empty image file".into()));
    }
    let format = image::guess_format(&bytes)?;
    Ok(ImageBuffer::new(format.to_mime_type(), bytes))
}

/// Decodes the pixels of a buffer.
pub fn decode_pixels(buffer: &ImageBuffer) -> Result<DynamicImage> {
    if buffer.is_empty() {
        return Err(MockupError::MalformedImageInput("Empty image data".into()));
    }
    Ok(image::load_from_memory(buffer.bytes())?)
}

/// Pixel width and height of an encoded buffer.
pub fn dimensions(buffer: &ImageBuffer) -> Result<(u32, u32)> {
    let img = decode_pixels(buffer)?;
    Ok((img.width(), img.height()))
}

/// Losslessly encodes RGBA pixels as PNG.
pub fn encode_png(pixels: &RgbaImage) -> Result<ImageBuffer> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(pixels.clone()).write_with_encoder(PngEncoder::new(&mut bytes))?;
    Ok(ImageBuffer::new("image/png", bytes))
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<ImageBuffer> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?;
    Ok(ImageBuffer::new("image/jpeg", bytes))
}

/// Target size when scaling `width` x `height` uniformly into the bounds.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = ((width as f64 * ratio).floor() as u32).clamp(1, max_width.max(1));
    let h = ((height as f64 * ratio).floor() as u32).clamp(1, max_height.max(1));
    (w, h)
}

/// Scales the image down to fit `max_width` x `max_height`, preserving aspect
/// ratio. Returns the input unchanged when it already fits.
pub fn constrain(buffer: &ImageBuffer, max_width: u32, max_height: u32, quality: u8) -> Result<ImageBuffer> {
    let img = decode_pixels(buffer)?;
    let (width, height) = (img.width(), img.height());
    let (target_w, target_h) = fit_within(width, height, max_width, max_height);
    if (target_w, target_h) == (width, height) {
        return Ok(buffer.clone());
    }

    log::debug!(
        "Downscaling {}x{} image to {}x{} before upload",
        width,
        height,
        target_w,
        target_h
    );
    let resized = img.resize_exact(target_w, target_h, FilterType::Triangle);

    if resized.color().has_alpha() {
        encode_png(&resized.to_rgba8())
    } else {
        encode_jpeg(&resized, quality)
    }
}

/// [`constrain`] with the configured upload limits.
pub fn constrain_for_upload(buffer: &ImageBuffer, limits: &UploadLimits) -> Result<ImageBuffer> {
    constrain(buffer, limits.max_width, limits.max_height, limits.jpeg_quality)
}
