//! Photo validation and normalization before the vision call.
//!
//! Uploads are decoded to prove they are real images, downscaled to max
//! 1024px on the longest edge to control API costs, and re-encoded as JPEG.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::info;

use crate::error::AnalysisError;

/// Maximum dimension (width or height) for images sent to the vision API.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// Minimum dimension for useful analysis; tiny thumbnails identify poorly.
pub const MIN_IMAGE_DIMENSION: u32 = 200;

/// Prepare an uploaded photo for the vision call: decode, validate, resize,
/// encode. Returns a base64-encoded JPEG payload.
pub fn prepare_image(image_bytes: &[u8]) -> Result<String, AnalysisError> {
    let img = image::load_from_memory(image_bytes).map_err(|e| {
        AnalysisError::InvalidImage(format!(
            "Failed to decode image: {}. Ensure it's a valid JPEG/PNG/WebP.",
            e
        ))
    })?;

    let (width, height) = (img.width(), img.height());
    info!("Loaded image: {}x{}", width, height);

    let min_side = width.min(height);
    if min_side < MIN_IMAGE_DIMENSION {
        return Err(AnalysisError::InvalidImage(format!(
            "Image too small for reliable analysis: {}x{}. Minimum dimension is {}px.",
            width, height, MIN_IMAGE_DIMENSION
        )));
    }

    let resized = resize_if_needed(img, MAX_IMAGE_DIMENSION);
    info!("Prepared image at {}x{}", resized.width(), resized.height());

    let jpeg_bytes = encode_to_jpeg(&resized)?;
    Ok(STANDARD.encode(&jpeg_bytes))
}

/// Resize if either dimension exceeds max, keeping the aspect ratio.
fn resize_if_needed(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width <= max_dimension && height <= max_dimension {
        return img;
    }

    let scale = max_dimension as f32 / width.max(height) as f32;
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

fn encode_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, AnalysisError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| AnalysisError::InvalidImage(format!("Failed to encode image to JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}

/// MIME type of the payload produced by [`prepare_image`].
pub fn image_media_type() -> &'static str {
    "image/jpeg"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_prepare_image_rejects_too_small() {
        let result = prepare_image(&png_bytes(50, 50));
        match result {
            Err(AnalysisError::InvalidImage(msg)) => assert!(msg.contains("too small")),
            other => panic!("Expected InvalidImage, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_prepare_image_rejects_non_image_bytes() {
        let result = prepare_image(b"definitely not an image");
        match result {
            Err(AnalysisError::InvalidImage(msg)) => assert!(msg.contains("Failed to decode")),
            other => panic!("Expected InvalidImage, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_resize_if_needed_keeps_small_images() {
        let img = DynamicImage::new_rgb8(500, 300);
        let resized = resize_if_needed(img, 1024);
        assert_eq!(resized.width(), 500);
        assert_eq!(resized.height(), 300);
    }

    #[test]
    fn test_resize_if_needed_scales_wide_images() {
        let img = DynamicImage::new_rgb8(2048, 1024);
        let resized = resize_if_needed(img, 1024);
        assert_eq!(resized.width(), 1024);
        assert_eq!(resized.height(), 512);
    }

    #[test]
    fn test_resize_if_needed_scales_tall_images() {
        let img = DynamicImage::new_rgb8(1024, 2048);
        let resized = resize_if_needed(img, 1024);
        assert_eq!(resized.width(), 512);
        assert_eq!(resized.height(), 1024);
    }

    #[test]
    fn test_prepare_image_outputs_base64_jpeg() {
        let base64_str = prepare_image(&png_bytes(300, 300)).unwrap();
        let jpeg_bytes = STANDARD.decode(&base64_str).unwrap();

        // JPEG magic bytes
        assert!(jpeg_bytes.len() > 2);
        assert_eq!(jpeg_bytes[0], 0xFF);
        assert_eq!(jpeg_bytes[1], 0xD8);
    }

    #[test]
    fn test_image_media_type_matches_encoder() {
        assert_eq!(image_media_type(), "image/jpeg");
    }
}
