use image::ImageEncoder as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;

use crate::foundation::error::{OliveError, OliveResult};
use crate::render::surface::PixelSurface;
use crate::request::options::OutputFormat;

/// Encoded image bytes, produced once and shared read-only by every write task.
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedImage {
    format: OutputFormat,
    bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// JPEG quality as a fraction of the 0..=100 scale.
pub fn quality_fraction(quality: u8) -> f32 {
    f32::from(quality.min(100)) / 100.0
}

/// Serialize `surface` in `format`. `quality` (0..=100) only affects JPEG.
pub fn encode_surface(
    surface: &PixelSurface,
    format: OutputFormat,
    quality: u8,
) -> OliveResult<EncodedImage> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes)
                .write_image(
                    &surface.data,
                    surface.width,
                    surface.height,
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| OliveError::encode(format!("png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            // The JPEG encoder takes 1..=100; a requested 0 maps to the lowest setting.
            let q = (quality_fraction(quality) * 100.0).round().clamp(1.0, 100.0) as u8;
            JpegEncoder::new_with_quality(&mut bytes, q)
                .write_image(
                    &surface.to_rgb8(),
                    surface.width,
                    surface.height,
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| OliveError::encode(format!("jpeg: {e}")))?;
        }
    }

    tracing::debug!(
        format = format.extension(),
        bytes = bytes.len(),
        "encoded surface"
    );
    Ok(EncodedImage { format, bytes })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/buffer.rs"]
mod tests;
