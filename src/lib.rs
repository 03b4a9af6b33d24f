//! # pixmill
//!
//! A raster-image manipulation engine: geometric transforms (resize, crop,
//! rotate, flip, EXIF auto-orientation), a filter pipeline (blur,
//! brightness/contrast, grayscale, colorize, sepia, vignette, pixelate and
//! friends), watermarking, and re-encoding to GIF, PNG, JPEG or base64.
//!
//! # Architecture
//!
//! ```text
//! bytes ──Codec::decode──▶ PixelBuffer ──geometry / filters──▶ PixelBuffer ──Codec::encode──▶ bytes
//!                               ▲
//!                 normalize: Args ─▶ Size, CropRect, Color, Position, ...
//! ```
//!
//! The [`Image`](image::Image) facade owns one buffer plus its metadata and
//! drives the pipeline. Callers describe parameters in whatever shape is
//! handy ([`normalize::Args`]); the normalizer turns them into typed values
//! before any pixel is touched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`image`] | The `Image` facade: load, transform, export |
//! | [`imaging`] | Pixel buffer, color model, geometry, filters, watermark, codec |
//! | [`normalize`] | Flexible parameter shapes → canonical geometry and color values |
//! | [`recipe`] | TOML-described transform pipelines |
//! | [`batch`] | Parallel recipe application over a directory tree |
//! | [`config`] | `pixmill.toml` loading and validation |
//! | [`error`] | Crate error type |
//!
//! # Design Decisions
//!
//! ## Copy-On-Success
//!
//! Geometric transforms never mutate their input. Each one computes a fresh
//! buffer and the facade swaps it in only once it exists, so an error leaves
//! the image exactly as it was. Filters cannot fail once their parameters
//! are normalized, so they work in place.
//!
//! ## Resampling
//!
//! Resize, crop and resize-crop read pixels through
//! [`PixelBuffer::resampled_copy`](imaging::PixelBuffer::resampled_copy), an
//! alpha-weighted area average over an axis-aligned source region. Oblique
//! rotation has no such region and samples each destination pixel
//! bilinearly instead. Flips and quarter turns are exact pixel permutations.
//!
//! ## Codec Behind a Trait
//!
//! Everything format-specific sits behind [`imaging::Codec`]. The engine is
//! tested against a recording mock; production uses the pure-Rust `image`
//! crate plus `kamadak-exif` for orientation tags.
//!
//! ## Side Effects Are Injected
//!
//! [`Image::generate`](image::Image::generate) takes an optional callback that
//! receives the content type, rather than writing transport headers itself.

pub mod batch;
pub mod config;
pub mod error;
pub mod image;
pub mod imaging;
pub mod normalize;
pub mod recipe;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
