//! Raster engine: pixels, geometry, filters and codecs.
//!
//! | Concern | Module | Crate / function |
//! |---|---|---|
//! | **Color** | [`color`] | legacy 0–127 transparency scale ↔ 8-bit alpha |
//! | **Pixels** | [`buffer`] | `image::RgbaImage` + area-averaging resample |
//! | **Geometry** | [`geometry`] | `imageops` flips / quarter turns, bilinear rotate |
//! | **Filters** | [`filters`] | 3×3 convolutions + per-pixel maps |
//! | **Watermark** | [`watermark`] | `imageops::overlay` |
//! | **Codec** | [`codec`] | `image` encoders/decoders, `kamadak-exif` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Buffer / Color**: The pixel model every operation reads and writes
//! - **Geometry / Filters / Watermark**: Buffer-to-buffer transforms
//! - **Codec / Format**: [`Codec`] trait + [`RustCodec`], MIME mapping

pub mod buffer;
pub(crate) mod calculations;
pub mod codec;
pub mod color;
pub mod filters;
pub mod format;
pub mod geometry;
pub mod watermark;

pub use buffer::{CANVAS_OPAQUE, CANVAS_TRANSPARENT, PixelBuffer, SourceRegion};
pub use calculations::ScaledCrop;
pub use codec::{Codec, EncodeOptions, ExifData, ImageInfo, RustCodec};
pub use color::Color;
pub use filters::BlurKind;
pub use format::Mime;
pub use geometry::{Orientation, ResizeMode};
pub use watermark::WatermarkOptions;
