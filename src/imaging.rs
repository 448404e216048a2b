//! Image transforms over `data:` URLs.
//!
//! Uploaded photos travel through the app as base64 `data:` URLs. Each
//! transform decodes, works on an RGBA buffer, and re-encodes as PNG so that
//! transparency produced by background removal survives every later stage.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "imaging_test.rs"]
mod imaging_test;

pub const DEFAULT_MAX_IMAGE_PX: u32 = 1024;

/// Pixels with alpha at or below this are treated as background when trimming.
pub const TRIM_ALPHA_THRESHOLD: u8 = 10;

/// Margin kept around the trimmed content, clamped to the image bounds.
pub const TRIM_PADDING_PX: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("data URL payload is not base64")]
    NotBase64,
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("invalid image dimensions")]
    Dimensions,
}

impl ErrorCode for ImageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotDataUrl | Self::NotBase64 | Self::Base64(_) => "E_IMAGE_FORMAT",
            Self::Decode(_) => "E_IMAGE_DECODE",
            Self::Encode(_) => "E_IMAGE_ENCODE",
            Self::Dimensions => "E_IMAGE_DIMENSIONS",
        }
    }

    fn user_message(&self) -> String {
        "画像の処理に失敗しました。もう一度お試しください。".to_owned()
    }
}

/// Bounds applied when shrinking uploaded photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeLimits {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self { max_width: DEFAULT_MAX_IMAGE_PX, max_height: DEFAULT_MAX_IMAGE_PX }
    }
}

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// # Errors
    ///
    /// Fails when the string is not a base64 `data:` URL.
    pub fn parse(raw: &str) -> Result<Self, ImageError> {
        let rest = raw.strip_prefix("data:").ok_or(ImageError::NotDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
        let mime = header.strip_suffix(";base64").ok_or(ImageError::NotBase64)?;
        let mime = if mime.is_empty() { "image/png" } else { mime };
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(Self { mime: mime.to_owned(), bytes })
    }

    #[must_use]
    pub fn png(bytes: Vec<u8>) -> Self {
        Self { mime: "image/png".to_owned(), bytes }
    }

    #[must_use]
    pub fn encode(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Decode a `data:` URL into an image.
///
/// # Errors
///
/// Fails on a malformed URL or undecodable image bytes.
pub fn decode(raw: &str) -> Result<DynamicImage, ImageError> {
    let url = DataUrl::parse(raw)?;
    image::load_from_memory(&url.bytes).map_err(|err| ImageError::Decode(err.to_string()))
}

/// Encode an image as a PNG `data:` URL.
///
/// # Errors
///
/// Fails when the PNG encoder rejects the buffer.
pub fn encode_png(image: &DynamicImage) -> Result<String, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| ImageError::Encode(err.to_string()))?;
    Ok(DataUrl::png(buf.into_inner()).encode())
}

/// Largest size within `limits` that keeps the aspect ratio. Never upscales.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_dimensions(width: u32, height: u32, limits: ResizeLimits) -> (u32, u32) {
    if width <= limits.max_width && height <= limits.max_height {
        return (width, height);
    }
    let ratio = (f64::from(limits.max_width) / f64::from(width))
        .min(f64::from(limits.max_height) / f64::from(height));
    let w = (f64::from(width) * ratio).floor().max(1.0) as u32;
    let h = (f64::from(height) * ratio).floor().max(1.0) as u32;
    (w, h)
}

/// Shrink to fit within `limits`, preserving aspect. Output is PNG.
///
/// # Errors
///
/// Fails on undecodable input or an empty image.
pub fn resize_to_fit(raw: &str, limits: ResizeLimits) -> Result<String, ImageError> {
    let image = decode(raw)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Dimensions);
    }
    let (w, h) = fit_dimensions(image.width(), image.height(), limits);
    if (w, h) == (image.width(), image.height()) {
        return encode_png(&image);
    }
    encode_png(&image.resize_exact(w, h, FilterType::Triangle))
}

/// Center-crop to `aspect` (width / height). Output is PNG.
///
/// # Errors
///
/// Fails on undecodable input, an empty image, or a non-positive aspect.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn crop_to_aspect(raw: &str, aspect: f64) -> Result<String, ImageError> {
    if !aspect.is_finite() || aspect <= 0.0 {
        return Err(ImageError::Dimensions);
    }
    let image = decode(raw)?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ImageError::Dimensions);
    }

    let current = f64::from(width) / f64::from(height);
    let (crop_w, crop_h) = if current > aspect {
        (((f64::from(height) * aspect).round() as u32).clamp(1, width), height)
    } else {
        (width, ((f64::from(width) / aspect).round() as u32).clamp(1, height))
    };
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;
    encode_png(&image.crop_imm(x, y, crop_w, crop_h))
}

/// Inclusive bounding box `(min_x, min_y, max_x, max_y)` of pixels whose
/// alpha exceeds [`TRIM_ALPHA_THRESHOLD`].
#[must_use]
pub fn content_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, px)| px.0[3] > TRIM_ALPHA_THRESHOLD)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

/// Crop away transparent margins, keeping [`TRIM_PADDING_PX`] around the content.
///
/// An image with no content pixels is returned unchanged (same string).
///
/// # Errors
///
/// Fails on undecodable input.
pub fn trim_transparent(raw: &str) -> Result<String, ImageError> {
    let image = decode(raw)?;
    let rgba = image.to_rgba8();
    let Some((x0, y0, x1, y1)) = content_bounds(&rgba) else {
        tracing::debug!("trim skipped: no opaque content");
        return Ok(raw.to_owned());
    };

    let left = x0.saturating_sub(TRIM_PADDING_PX);
    let top = y0.saturating_sub(TRIM_PADDING_PX);
    let right = (x1 + TRIM_PADDING_PX).min(rgba.width() - 1);
    let bottom = (y1 + TRIM_PADDING_PX).min(rgba.height() - 1);

    let trimmed = DynamicImage::ImageRgba8(rgba).crop_imm(left, top, right - left + 1, bottom - top + 1);
    encode_png(&trimmed)
}
