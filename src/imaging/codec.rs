//! The codec seam: compressed bytes in and out of a [`PixelBuffer`].
//!
//! The [`Codec`] trait is the only place format-specific work happens:
//! decoding, encoding and reading header metadata. The production
//! implementation is [`RustCodec`]:
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (GIF, PNG, JPEG) | `image::load_from_memory_with_format` |
//! | Encode GIF | `image::codecs::gif::GifEncoder` (quality → speed) |
//! | Encode PNG | `image::codecs::png::PngEncoder` (compression 0–9 → level), alpha kept |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` (quality), alpha dropped |
//! | Dimensions / format | `image::ImageReader` header probe |
//! | EXIF (JPEG only) | `kamadak-exif` |

use super::buffer::PixelBuffer;
use super::format::Mime;
use crate::error::{Error, Result};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Cursor;

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// GIF/JPEG quality, 0–100.
    pub quality: u8,
    /// PNG compression level, 0–9.
    pub compression: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            compression: 9,
        }
    }
}

/// EXIF data read from a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExifData {
    /// Orientation tag (1–8) when present.
    pub orientation: Option<u32>,
    /// Every primary-IFD tag, by tag name.
    pub tags: BTreeMap<String, String>,
}

/// Header information for an encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub mime: Mime,
    pub exif: Option<ExifData>,
}

/// Trait for raster codecs.
///
/// Implementations must handle GIF, PNG and JPEG, and PNG encoding must
/// preserve alpha.
pub trait Codec: Sync {
    /// Probe dimensions, format and (for JPEG) EXIF without a full decode.
    fn inspect(&self, bytes: &[u8]) -> Result<ImageInfo>;

    fn decode(&self, bytes: &[u8], mime: Mime) -> Result<PixelBuffer>;

    fn encode(&self, buffer: &PixelBuffer, mime: Mime, options: EncodeOptions) -> Result<Vec<u8>>;
}

/// `image`-crate codec, pure Rust.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy)]
pub struct RustCodec {
    _private: (),
}

impl RustCodec {
    /// Fails with [`Error::ExtensionUnavailable`] when a required format was
    /// not compiled into the `image` crate.
    pub fn new() -> Result<Self> {
        for mime in Mime::ALL {
            let format = mime.image_format();
            if !format.reading_enabled() || !format.writing_enabled() {
                return Err(Error::ExtensionUnavailable(format!(
                    "{mime} read/write support"
                )));
            }
        }
        Ok(Self { _private: () })
    }
}

fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// GIF quantization speed (1 = best, 30 = fastest) from a 0–100 quality.
fn gif_speed(quality: u8) -> i32 {
    let q = quality.min(100) as i32;
    30 - q * 29 / 100
}

fn read_exif(bytes: &[u8]) -> Option<ExifData> {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable EXIF block ignored");
            return None;
        }
    };
    let orientation = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0));
    let tags = exif
        .fields()
        .filter(|f| f.ifd_num == exif::In::PRIMARY)
        .map(|f| {
            (
                f.tag.to_string(),
                f.display_value().with_unit(&exif).to_string(),
            )
        })
        .collect();
    Some(ExifData { orientation, tags })
}

impl Codec for RustCodec {
    fn inspect(&self, bytes: &[u8]) -> Result<ImageInfo> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let mime = reader
            .format()
            .and_then(Mime::from_image_format)
            .ok_or_else(|| Error::InvalidMime(format!("{:?}", reader.format())))?;
        let (width, height) = reader.into_dimensions()?;
        let exif = match mime {
            Mime::Jpeg => read_exif(bytes),
            _ => None,
        };
        Ok(ImageInfo {
            width,
            height,
            mime,
            exif,
        })
    }

    fn decode(&self, bytes: &[u8], mime: Mime) -> Result<PixelBuffer> {
        let img = image::load_from_memory_with_format(bytes, mime.image_format())?;
        tracing::debug!(%mime, width = img.width(), height = img.height(), "decoded");
        Ok(PixelBuffer::from_rgba(img.to_rgba8()))
    }

    fn encode(&self, buffer: &PixelBuffer, mime: Mime, options: EncodeOptions) -> Result<Vec<u8>> {
        let (w, h) = buffer.dimensions();
        let mut out = Vec::with_capacity((w * h) as usize);
        match mime {
            Mime::Png => {
                PngEncoder::new_with_quality(
                    &mut out,
                    png_compression(options.compression),
                    FilterType::Adaptive,
                )
                .write_image(buffer.as_rgba().as_raw(), w, h, ExtendedColorType::Rgba8)?;
            }
            Mime::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(buffer.as_rgba().clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut out, options.quality.clamp(1, 100))
                    .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)?;
            }
            Mime::Gif => {
                let mut encoder = GifEncoder::new_with_speed(&mut out, gif_speed(options.quality));
                encoder.encode(buffer.as_rgba().as_raw(), w, h, ExtendedColorType::Rgba8)?;
            }
        }
        tracing::debug!(%mime, bytes = out.len(), "encoded");
        Ok(out)
    }
}
