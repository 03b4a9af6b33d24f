//! Owned RGBA pixel grid and the resampled block copy every geometric
//! transform is built on.

use super::color::Color;
use crate::error::{Error, Result};
use image::{Rgba, RgbaImage};

/// Fill for freshly allocated transparent canvases: transparent white.
pub const CANVAS_TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Fill for opaque canvases.
pub const CANVAS_OPAQUE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A rectangle of the source buffer, in (possibly fractional) pixels.
///
/// The origin may be negative and the extent may run past the source
/// edges; area outside the source contributes nothing to the copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width`×`height` buffer.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }
}

/// A width×height grid of RGBA samples, exclusively owned.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: RgbaImage,
}

impl PixelBuffer {
    /// Allocate a canvas. Transparent canvases start as transparent white,
    /// opaque ones as black.
    pub fn allocate(width: u32, height: u32, transparent: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid(format!(
                "Canvas size must be positive, got {width}x{height}"
            )));
        }
        let fill = if transparent {
            CANVAS_TRANSPARENT
        } else {
            CANVAS_OPAQUE
        };
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, fill),
        })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Write one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        if let Some(p) = self.pixels.get_pixel_mut_checked(x, y) {
            *p = pixel;
        }
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba();
        for p in self.pixels.pixels_mut() {
            *p = rgba;
        }
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    /// Copy `src` of this buffer into a new transparent `dst_w`×`dst_h`
    /// buffer, resampling.
    ///
    /// Each destination pixel averages the source area under its footprint,
    /// weighted by overlap and by alpha. The footprint is never narrower than
    /// one source pixel, so upscaling degrades to bilinear interpolation and
    /// a 1:1 copy at integer offsets is exact.
    pub fn resampled_copy(&self, dst_w: u32, dst_h: u32, src: SourceRegion) -> Result<Self> {
        if src.width <= 0.0 || src.height <= 0.0 || !src.width.is_finite() || !src.height.is_finite()
        {
            return Err(Error::invalid(format!(
                "Source region must have a positive size, got {}x{}",
                src.width, src.height
            )));
        }
        let mut dest = Self::allocate(dst_w, dst_h, true)?;

        let cols = axis_footprints(dst_w, src.x, src.width, self.width());
        let rows = axis_footprints(dst_h, src.y, src.height, self.height());

        for (dy, row) in rows.iter().enumerate() {
            for (dx, col) in cols.iter().enumerate() {
                if let Some(pixel) = self.average(row, col) {
                    dest.pixels.put_pixel(dx as u32, dy as u32, pixel);
                }
            }
        }
        Ok(dest)
    }

    fn average(&self, rows: &[(u32, f64)], cols: &[(u32, f64)]) -> Option<Rgba<u8>> {
        let mut premul = [0.0f64; 3];
        let mut plain = [0.0f64; 3];
        let mut alpha = 0.0;
        let mut area = 0.0;

        for &(sy, wy) in rows {
            for &(sx, wx) in cols {
                let w = wx * wy;
                let p = self.pixels.get_pixel(sx, sy);
                let a = p[3] as f64 * w;
                for c in 0..3 {
                    premul[c] += p[c] as f64 * a;
                    plain[c] += p[c] as f64 * w;
                }
                alpha += a;
                area += w;
            }
        }
        if area <= 0.0 {
            return None;
        }

        let channel = |c: usize| {
            let v = if alpha > 0.0 {
                premul[c] / alpha
            } else {
                plain[c] / area
            };
            v.round().clamp(0.0, 255.0) as u8
        };
        Some(Rgba([
            channel(0),
            channel(1),
            channel(2),
            (alpha / area).round().clamp(0.0, 255.0) as u8,
        ]))
    }
}

/// For every destination index along one axis, the source indices under
/// its footprint with their overlap weights.
fn axis_footprints(dst_len: u32, src_start: f64, src_len: f64, limit: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len / dst_len as f64;
    let half = scale.max(1.0) / 2.0;
    let lower = src_start.max(0.0);
    let upper = (src_start + src_len).min(limit as f64);

    (0..dst_len)
        .map(|d| {
            let center = src_start + (d as f64 + 0.5) * scale;
            let lo = (center - half).max(lower);
            let hi = (center + half).min(upper);
            if hi <= lo {
                return Vec::new();
            }
            let first = lo.floor() as u32;
            let last = (hi.ceil() as u32).min(limit);
            (first..last)
                .filter_map(|s| {
                    let overlap = (hi.min(s as f64 + 1.0) - lo.max(s as f64)).max(0.0);
                    (overlap > 1e-9).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}
