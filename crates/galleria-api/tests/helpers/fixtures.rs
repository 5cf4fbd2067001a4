//! Test fixtures: real encoded images and a fake executable.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([200, 40, 90, 255]),
    ));
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Png)
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Jpeg)
}

pub fn create_test_gif(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Gif)
}

/// Bytes that start with a PE/DOS header.
pub fn create_fake_executable() -> Vec<u8> {
    let mut data = b"MZ\x90\x00\x03\x00\x00\x00".to_vec();
    data.extend_from_slice(&[0u8; 512]);
    data
}
