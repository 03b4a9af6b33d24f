//! The [`Image`] facade.
//!
//! An `Image` owns at most one [`PixelBuffer`] plus its [`Metadata`] and a
//! codec. Every transform computes its result fully before swapping it in, so
//! a failing call leaves the previous buffer untouched. Transforms return
//! `&mut Self` for chaining:
//!
//! ```text
//! let mut img = Image::open("photo.jpg")?;
//! img.resize("resizecrop", [400, 300])?
//!     .vignette(0.7, 0.8)?
//!     .sepia(0)?;
//! img.save(Some(Path::new("out.png")))?;
//! ```

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::imaging::calculations::{ScaledCrop, scale_crop_measures};
use crate::imaging::{
    BlurKind, Codec, EncodeOptions, ExifData, Mime, Orientation, PixelBuffer, ResizeMode,
    RustCodec, WatermarkOptions, filters, geometry, watermark,
};
use crate::normalize::{self, Args, Size};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image properties. `width`/`height` always match the owned buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub width: u32,
    pub height: u32,
    /// `None` for canvases created from scratch.
    pub mime: Option<Mime>,
    pub exif: Option<ExifData>,
    /// GIF/JPEG export quality, 0–100.
    pub quality: u8,
    /// PNG compression level, 0–9.
    pub compression: u8,
}

impl Default for Metadata {
    fn default() -> Self {
        let options = EncodeOptions::default();
        Self {
            width: 0,
            height: 0,
            mime: None,
            exif: None,
            quality: options.quality,
            compression: options.compression,
        }
    }
}

/// Keyed form of [`Image::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub file: PathBuf,
    pub quality: Option<u8>,
}

pub struct Image<C: Codec = RustCodec> {
    codec: C,
    buffer: Option<PixelBuffer>,
    metadata: Metadata,
    filename: Option<PathBuf>,
}

impl<C: Codec> fmt::Debug for Image<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("metadata", &self.metadata)
            .field("filename", &self.filename)
            .field("loaded", &self.buffer.is_some())
            .finish()
    }
}

impl Image<RustCodec> {
    /// An empty image backed by the `image`-crate codec.
    pub fn new() -> Result<Self> {
        Ok(Self::with_codec(RustCodec::new()?))
    }

    /// Load `file` and apply its EXIF orientation.
    pub fn open(file: impl AsRef<Path>) -> Result<Self> {
        let mut img = Self::new()?;
        img.load(file)?.auto_orientate()?;
        Ok(img)
    }
}

impl<C: Codec> Image<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            buffer: None,
            metadata: Metadata::default(),
            filename: None,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn into_buffer(self) -> Option<PixelBuffer> {
        self.buffer
    }

    /// Apply export settings from the engine configuration.
    pub fn configure(&mut self, config: &EngineConfig) -> &mut Self {
        self.set_quality(config.quality).set_compression(config.compression)
    }

    pub fn set_quality(&mut self, quality: u8) -> &mut Self {
        self.metadata.quality = quality.min(100);
        self
    }

    pub fn set_compression(&mut self, compression: u8) -> &mut Self {
        self.metadata.compression = compression.min(9);
        self
    }

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            quality: self.metadata.quality,
            compression: self.metadata.compression,
        }
    }

    fn current(&self) -> Result<&PixelBuffer> {
        self.buffer
            .as_ref()
            .ok_or_else(|| Error::invalid("No image loaded."))
    }

    fn current_mut(&mut self) -> Result<&mut PixelBuffer> {
        self.buffer
            .as_mut()
            .ok_or_else(|| Error::invalid("No image loaded."))
    }

    fn replace(&mut self, buffer: PixelBuffer) {
        (self.metadata.width, self.metadata.height) = buffer.dimensions();
        self.buffer = Some(buffer);
    }

    // =========================================================================
    // Loading and creation
    // =========================================================================

    /// Read, probe and decode `file`.
    pub fn load(&mut self, file: impl AsRef<Path>) -> Result<&mut Self> {
        let path = file.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::invalid("Image file has not been set."));
        }
        if !path.exists() {
            return Err(Error::FileNotExist(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;
        let info = self.codec.inspect(&bytes)?;
        let buffer = self.codec.decode(&bytes, info.mime)?;
        debug!(path = %path.display(), mime = %info.mime, width = buffer.width(), height = buffer.height(), "loaded");

        self.metadata.mime = Some(info.mime);
        self.metadata.exif = info.exif;
        self.filename = Some(path.to_path_buf());
        self.replace(buffer);
        Ok(self)
    }

    pub fn load_with(&mut self, options: LoadOptions) -> Result<&mut Self> {
        self.load(&options.file)?;
        if let Some(quality) = options.quality {
            self.set_quality(quality);
        }
        Ok(self)
    }

    /// Load from a base64 string, optionally wrapped as a `data:image/...;base64,` URI.
    ///
    /// The declared MIME of a data URI wins for metadata; otherwise it is
    /// sniffed from the decoded bytes.
    pub fn from_string(&mut self, data: &str) -> Result<&mut Self> {
        let (declared, payload) = split_data_uri(data.trim())?;
        let bytes = STANDARD
            .decode(payload.trim())
            .ok()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::invalid("The given value does not seem a valid base64 string"))?;

        let info = self.codec.inspect(&bytes)?;
        let buffer = self.codec.decode(&bytes, info.mime)?;
        let mime = declared.unwrap_or(info.mime);
        debug!(%mime, width = buffer.width(), height = buffer.height(), "loaded from string");

        self.metadata.mime = Some(mime);
        self.metadata.exif = info.exif;
        self.filename = None;
        self.replace(buffer);
        Ok(self)
    }

    /// Replace the content with a blank transparent canvas.
    ///
    /// With `None` the current size is reused, which empties the canvas.
    pub fn create(&mut self, size: Option<Size>) -> Result<&mut Self> {
        let size = match (size, &self.buffer) {
            (Some(size), _) => size,
            (None, Some(buffer)) => Size::new(buffer.width(), buffer.height()),
            (None, None) => return Err(Error::invalid("You must set the canvas size.")),
        };
        let canvas = PixelBuffer::allocate(size.width, size.height, true)?;
        debug!(width = size.width, height = size.height, "canvas created");

        self.metadata.mime = None;
        self.metadata.exif = None;
        self.replace(canvas);
        Ok(self)
    }

    /// Take ownership of an externally built buffer.
    pub fn set_image(&mut self, buffer: PixelBuffer) -> &mut Self {
        self.replace(buffer);
        self
    }

    /// Drop the buffer, metadata and filename. Export settings are kept.
    pub fn destroy(&mut self) -> &mut Self {
        self.buffer = None;
        self.filename = None;
        self.metadata = Metadata {
            quality: self.metadata.quality,
            compression: self.metadata.compression,
            ..Metadata::default()
        };
        self
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Resize by policy name: `classic`/`resize`, `reduce`/`resizemin`/`min`,
    /// `crop` or `resizecrop`.
    pub fn resize(&mut self, mode: &str, size: impl Into<Args>) -> Result<&mut Self> {
        let mode: ResizeMode = mode.parse()?;
        let size = normalize::size(&size.into())?;
        if let Some(out) = geometry::resize(self.current()?, mode, size)? {
            self.replace(out);
        }
        Ok(self)
    }

    pub fn classic_resize(&mut self, size: impl Into<Args>) -> Result<&mut Self> {
        self.resize("classic", size)
    }

    pub fn reduce(&mut self, size: impl Into<Args>) -> Result<&mut Self> {
        self.resize("reduce", size)
    }

    pub fn classic_crop(&mut self, size: impl Into<Args>) -> Result<&mut Self> {
        self.resize("crop", size)
    }

    pub fn resize_crop(&mut self, size: impl Into<Args>) -> Result<&mut Self> {
        self.resize("resizecrop", size)
    }

    pub fn crop(&mut self, rect: impl Into<Args>) -> Result<&mut Self> {
        let rect = normalize::crop(&rect.into())?;
        let out = geometry::crop(self.current()?, rect)?;
        self.replace(out);
        Ok(self)
    }

    /// Rotate clockwise by `degrees`, exposing a transparent background.
    pub fn rotate(&mut self, degrees: f64) -> Result<&mut Self> {
        self.rotate_with_background(degrees, -1)
    }

    pub fn rotate_with_background(
        &mut self,
        degrees: f64,
        background: impl Into<Args>,
    ) -> Result<&mut Self> {
        let background = normalize::color(&background.into())?;
        let out = geometry::rotate(self.current()?, degrees, background)?;
        self.replace(out);
        Ok(self)
    }

    pub fn flip(&mut self, axis: &str) -> Result<&mut Self> {
        let axis = normalize::flip(axis)?;
        let out = geometry::flip(self.current()?, axis);
        self.replace(out);
        Ok(self)
    }

    /// Apply the EXIF orientation tag read at load time. No tag, no-op.
    pub fn auto_orientate(&mut self) -> Result<&mut Self> {
        let Some(tag) = self.metadata.exif.as_ref().and_then(|e| e.orientation) else {
            return Ok(self);
        };
        if let Some(out) = geometry::auto_orientate(self.current()?, Orientation::from_exif(tag))? {
            self.replace(out);
        }
        Ok(self)
    }

    /// Map a crop drawn on `cropped` (a smaller rendition of this image)
    /// onto this image's coordinates.
    pub fn calculate_crop_measures<D: Codec>(
        &self,
        cropped: &Image<D>,
        measures: impl Into<Args>,
    ) -> Result<ScaledCrop> {
        let measures = normalize::crop_measures(&measures.into())?;
        let current = self.current()?.dimensions();
        let smaller = cropped.current()?.dimensions();
        Ok(scale_crop_measures(current, smaller, measures))
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn fill(&mut self, color: impl Into<Args>) -> Result<&mut Self> {
        let color = normalize::color(&color.into())?;
        self.current_mut()?.fill(color);
        Ok(self)
    }

    /// `kind` is `gaussian` (default) or `selective`.
    pub fn blur(&mut self, kind: Option<&str>, passes: u32) -> Result<&mut Self> {
        let kind = match kind {
            Some(name) => name.parse()?,
            None => BlurKind::Gaussian,
        };
        filters::blur(self.current_mut()?, kind, passes);
        Ok(self)
    }

    pub fn brightness(&mut self, level: i32) -> Result<&mut Self> {
        filters::brightness(self.current_mut()?, level);
        Ok(self)
    }

    pub fn contrast(&mut self, level: i32) -> Result<&mut Self> {
        filters::contrast(self.current_mut()?, level);
        Ok(self)
    }

    pub fn smooth(&mut self, level: i32) -> Result<&mut Self> {
        filters::smooth(self.current_mut()?, level);
        Ok(self)
    }

    pub fn grayscale(&mut self) -> Result<&mut Self> {
        filters::grayscale(self.current_mut()?);
        Ok(self)
    }

    pub fn negate(&mut self) -> Result<&mut Self> {
        filters::negate(self.current_mut()?);
        Ok(self)
    }

    pub fn edge_detection(&mut self) -> Result<&mut Self> {
        filters::edge_detection(self.current_mut()?);
        Ok(self)
    }

    pub fn emboss(&mut self) -> Result<&mut Self> {
        filters::emboss(self.current_mut()?);
        Ok(self)
    }

    pub fn mean_remove(&mut self) -> Result<&mut Self> {
        filters::mean_remove(self.current_mut()?);
        Ok(self)
    }

    pub fn colorize(&mut self, color: impl Into<Args>) -> Result<&mut Self> {
        let color = normalize::color(&color.into())?;
        filters::colorize(self.current_mut()?, color);
        Ok(self)
    }

    pub fn pixelate(&mut self, block_size: u32, advanced: bool) -> Result<&mut Self> {
        filters::pixelate(self.current_mut()?, block_size, advanced);
        Ok(self)
    }

    pub fn sepia(&mut self, alpha: u8) -> Result<&mut Self> {
        filters::sepia(self.current_mut()?, alpha);
        Ok(self)
    }

    pub fn vignette(&mut self, size: f64, level: f64) -> Result<&mut Self> {
        filters::vignette(self.current_mut()?, size, level);
        Ok(self)
    }

    /// Composite the image stored in `file` on top of this one.
    pub fn watermark(
        &mut self,
        file: impl AsRef<Path>,
        options: &WatermarkOptions,
    ) -> Result<&mut Self> {
        let path = file.as_ref();
        let base = self.current()?;
        if !path.exists() {
            return Err(Error::FileNotExist(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let info = self.codec.inspect(&bytes)?;
        let mark = self.codec.decode(&bytes, info.mime)?;
        if let Some(out) = watermark::apply(base, &mark, options)? {
            self.replace(out);
        }
        Ok(self)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Encode the image, and write it to `file` when given.
    ///
    /// The output format comes from `output` (a MIME string), else the
    /// extension of `file`, else the loaded MIME. When no file is given,
    /// `header` receives the content type once encoding succeeded.
    pub fn generate(
        &self,
        file: Option<&Path>,
        output: Option<&str>,
        header: Option<&mut dyn FnMut(&str)>,
    ) -> Result<Vec<u8>> {
        let buffer = self.current()?;
        let mime = self.output_mime(file, output)?;
        let bytes = self.codec.encode(buffer, mime, self.encode_options())?;
        debug!(%mime, bytes = bytes.len(), "generated");

        match file {
            Some(path) => fs::write(path, &bytes)?,
            None => {
                if let Some(emit) = header {
                    emit(mime.as_str());
                }
            }
        }
        Ok(bytes)
    }

    fn output_mime(&self, file: Option<&Path>, output: Option<&str>) -> Result<Mime> {
        if let Some(output) = output {
            return Mime::from_mime(output)
                .ok_or_else(|| Error::invalid(format!("Invalid output format \"{output}\"")));
        }
        if let Some(path) = file {
            return Mime::from_path(path);
        }
        self.metadata
            .mime
            .ok_or_else(|| Error::invalid("Invalid output format \"\""))
    }

    /// Write to `file`, or back to the file the image was loaded from.
    pub fn save(&self, file: Option<&Path>) -> Result<PathBuf> {
        let path = match (file, &self.filename) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(loaded)) => loaded.clone(),
            (None, None) => return Err(Error::invalid("No file name to save to.")),
        };
        self.generate(Some(&path), None, None)?;
        Ok(path)
    }

    /// Base64 of the encoded image, optionally as a data URI.
    pub fn to_base64(&self, prefix: bool) -> Result<String> {
        let bytes = self.generate(None, None, None)?;
        let encoded = STANDARD.encode(bytes);
        match (prefix, self.metadata.mime) {
            (true, Some(mime)) => Ok(format!("data:{mime};base64,{encoded}")),
            _ => Ok(encoded),
        }
    }
}

/// Split an optional `data:<mime>;base64,` prefix off `data`.
fn split_data_uri(data: &str) -> Result<(Option<Mime>, &str)> {
    if !data.starts_with("data:image") {
        return Ok((None, data));
    }
    let (mime, payload) = data["data:".len()..]
        .split_once(";base64,")
        .ok_or_else(|| Error::invalid("Malformed data URI"))?;
    let mime = Mime::from_mime(mime).ok_or_else(|| Error::InvalidMime(mime.to_string()))?;
    Ok((Some(mime), payload))
}
