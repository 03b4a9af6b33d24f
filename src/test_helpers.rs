//! Shared test utilities for the pixmill test suite.
//!
//! Provides synthetic pixel buffers and encoded fixtures so tests never
//! depend on files checked into the repository.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let buf = gradient(6, 4);          // every pixel distinct, opaque
//! let red = solid(2, 2, Rgba([255, 0, 0, 255]));
//! let bytes = jpeg_with_orientation(6, 4, 6);
//! ```

use crate::imaging::{Codec, EncodeOptions, Mime, PixelBuffer, RustCodec};
use image::{Rgba, RgbaImage};

// =========================================================================
// Pixel buffers
// =========================================================================

/// Opaque buffer whose pixels are pairwise distinct for sides up to 256.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 37 % 256) as u8,
            (y * 53 % 256) as u8,
            ((x + y) * 11 % 256) as u8,
            255,
        ])
    }))
}

/// Buffer filled with one color.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> PixelBuffer {
    PixelBuffer::from_rgba(RgbaImage::from_pixel(width, height, color))
}

// =========================================================================
// Encoded fixtures
// =========================================================================

/// Encode a gradient in the given format with the real codec.
pub fn encoded(width: u32, height: u32, mime: Mime) -> Vec<u8> {
    RustCodec::new()
        .unwrap()
        .encode(&gradient(width, height), mime, EncodeOptions::default())
        .unwrap()
}

/// A JPEG carrying a minimal EXIF block with the given orientation tag.
///
/// The APP1 segment is spliced in right after the SOI marker.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let jpeg = encoded(width, height, Mime::Jpeg);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "missing SOI marker");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A\0\0\0\x08"); // big-endian, IFD0 at 8
    tiff.extend_from_slice(&1u16.to_be_bytes()); // one entry
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}
