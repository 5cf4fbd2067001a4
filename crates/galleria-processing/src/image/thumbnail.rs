//! Thumbnail deriver
//!
//! Produces a copy of the original that fits in a
//! [`MAX_THUMBNAIL_DIMENSION`]² box, keeps the aspect ratio, never upscales and
//! is encoded in the same format as the input.

use galleria_core::{AppError, MediaKind};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Bounding box edge for thumbnails, in pixels.
pub const MAX_THUMBNAIL_DIMENSION: u32 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("{kind} decoding is not enabled in this build")]
    DecoderDisabled { kind: MediaKind },

    #[error("Failed to decode {kind} image: {source}")]
    Decode {
        kind: MediaKind,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {kind} thumbnail: {source}")]
    Encode {
        kind: MediaKind,
        #[source]
        source: image::ImageError,
    },
}

impl From<ThumbnailError> for AppError {
    fn from(err: ThumbnailError) -> Self {
        AppError::ThumbnailGenerationFailed(err.to_string())
    }
}

fn image_format(kind: MediaKind) -> ImageFormat {
    match kind {
        MediaKind::Jpeg => ImageFormat::Jpeg,
        MediaKind::Png => ImageFormat::Png,
        MediaKind::Webp => ImageFormat::WebP,
        MediaKind::Gif => ImageFormat::Gif,
        MediaKind::Avif => ImageFormat::Avif,
    }
}

/// AVIF pixels need the native dav1d decoder behind the `avif` feature.
fn decoder_enabled(kind: MediaKind) -> bool {
    !matches!(kind, MediaKind::Avif) || cfg!(feature = "avif")
}

/// Target size for an image of `width`×`height` inside a `max`×`max` box.
///
/// Images already inside the box keep their size. Larger images are scaled
/// by the tighter of the two ratios; neither side rounds below one pixel.
pub fn thumbnail_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let scale = (max as f64 / width as f64).min(max as f64 / height as f64);
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max);
    (new_width, new_height)
}

/// Pick a resampling filter by downscale ratio.
///
/// Large reductions use a cheaper filter; close-to-original sizes get Lanczos.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Encoders differ in the pixel layouts they accept.
fn encodable(img: DynamicImage, kind: MediaKind) -> DynamicImage {
    match kind {
        MediaKind::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        MediaKind::Png => img,
        MediaKind::Webp | MediaKind::Gif | MediaKind::Avif => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
    }
}

/// Synchronous thumbnail rendering. CPU-bound; call from a blocking context.
pub fn render_thumbnail(data: &[u8], kind: MediaKind) -> Result<Vec<u8>, ThumbnailError> {
    if !decoder_enabled(kind) {
        return Err(ThumbnailError::DecoderDisabled { kind });
    }
    let format = image_format(kind);

    let img = image::load_from_memory_with_format(data, format)
        .map_err(|source| ThumbnailError::Decode { kind, source })?;

    let (width, height) = img.dimensions();
    let (new_width, new_height) = thumbnail_dimensions(width, height, MAX_THUMBNAIL_DIMENSION);

    let resized = if (new_width, new_height) == (width, height) {
        img
    } else {
        let filter = select_filter(width, height, new_width, new_height);
        img.resize_exact(new_width, new_height, filter)
    };

    let mut buffer = Vec::new();
    encodable(resized, kind)
        .write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|source| ThumbnailError::Encode { kind, source })?;

    Ok(buffer)
}

/// Derive the thumbnail for `data` on the blocking thread pool.
pub async fn generate_thumbnail(data: Vec<u8>, kind: MediaKind) -> Result<Vec<u8>, AppError> {
    let start = std::time::Instant::now();
    let input_size = data.len();

    let thumbnail = tokio::task::spawn_blocking(move || render_thumbnail(&data, kind))
        .await
        .map_err(|e| AppError::Internal(format!("Thumbnail task failed: {}", e)))??;

    tracing::debug!(
        media_type = %kind,
        size_bytes = input_size,
        thumbnail_bytes = thumbnail.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Thumbnail generated"
    );

    Ok(thumbnail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([0, 128, 255, 255]),
        ));
        let img = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        };
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
        image::load_from_memory(data).unwrap().dimensions()
    }

    #[test]
    fn test_thumbnail_dimensions_small_image_untouched() {
        assert_eq!(thumbnail_dimensions(800, 600, 1024), (800, 600));
        assert_eq!(thumbnail_dimensions(1024, 1024, 1024), (1024, 1024));
        assert_eq!(thumbnail_dimensions(1, 1, 1024), (1, 1));
    }

    #[test]
    fn test_thumbnail_dimensions_preserve_aspect_ratio() {
        assert_eq!(thumbnail_dimensions(4000, 3000, 1024), (1024, 768));
        assert_eq!(thumbnail_dimensions(3000, 4000, 1024), (768, 1024));
        assert_eq!(thumbnail_dimensions(2048, 2048, 1024), (1024, 1024));
    }

    #[test]
    fn test_thumbnail_dimensions_extreme_ratio_keeps_one_pixel() {
        assert_eq!(thumbnail_dimensions(10000, 1, 1024), (1024, 1));
        assert_eq!(thumbnail_dimensions(1, 10000, 1024), (1, 1024));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(select_filter(4000, 3000, 1024, 768), FilterType::Triangle);
        assert_eq!(select_filter(1400, 1400, 1024, 1024), FilterType::Lanczos3);
        assert_eq!(select_filter(1800, 1800, 1024, 1024), FilterType::CatmullRom);
    }

    #[test]
    fn test_render_png_keeps_small_size_and_format() {
        let data = create_test_image(800, 600, ImageFormat::Png);
        let thumb = render_thumbnail(&data, MediaKind::Png).unwrap();

        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Png);
        assert_eq!(decoded_dimensions(&thumb), (800, 600));
    }

    #[test]
    fn test_render_jpeg_downscales_into_box() {
        let data = create_test_image(2000, 1000, ImageFormat::Jpeg);
        let thumb = render_thumbnail(&data, MediaKind::Jpeg).unwrap();

        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Jpeg);
        assert_eq!(decoded_dimensions(&thumb), (1024, 512));
    }

    #[test]
    fn test_render_gif_and_webp() {
        let gif = create_test_image(1200, 300, ImageFormat::Gif);
        let thumb = render_thumbnail(&gif, MediaKind::Gif).unwrap();
        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Gif);
        assert_eq!(decoded_dimensions(&thumb), (1024, 256));

        let webp = create_test_image(64, 32, ImageFormat::WebP);
        let thumb = render_thumbnail(&webp, MediaKind::Webp).unwrap();
        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::WebP);
        assert_eq!(decoded_dimensions(&thumb), (64, 32));
    }

    #[test]
    fn test_render_corrupt_data_fails() {
        let mut data = create_test_image(32, 32, ImageFormat::Png);
        data.truncate(40);
        assert!(matches!(
            render_thumbnail(&data, MediaKind::Png),
            Err(ThumbnailError::Decode { .. })
        ));
    }

    #[cfg(feature = "avif")]
    #[test]
    fn test_render_avif_round_trip() {
        let data = create_test_image(1600, 100, ImageFormat::Avif);
        let thumb = render_thumbnail(&data, MediaKind::Avif).unwrap();

        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Avif);
        let decoded = image::load_from_memory_with_format(&thumb, ImageFormat::Avif).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 64));
    }

    #[cfg(not(feature = "avif"))]
    #[tokio::test]
    async fn test_avif_rejected_when_decoder_disabled() {
        // Never decoded, so the header alone is enough.
        let data = b"\0\0\0\x1cftypavif\0\0\0\0avifmif1miaf".to_vec();
        assert!(matches!(
            render_thumbnail(&data, MediaKind::Avif),
            Err(ThumbnailError::DecoderDisabled {
                kind: MediaKind::Avif
            })
        ));

        let result = generate_thumbnail(data, MediaKind::Avif).await;
        match result {
            Err(AppError::ThumbnailGenerationFailed(msg)) => {
                assert!(msg.contains("not enabled"), "{msg}")
            }
            other => panic!("Expected ThumbnailGenerationFailed, got {:?}", other.map(|t| t.len())),
        }
    }

    #[tokio::test]
    async fn test_generate_thumbnail_maps_failure() {
        let result =
            generate_thumbnail(b"\x89PNG\r\n\x1a\ngarbage".to_vec(), MediaKind::Png).await;
        assert!(matches!(
            result,
            Err(AppError::ThumbnailGenerationFailed(_))
        ));
    }
}
