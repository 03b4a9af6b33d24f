//! Pure calculation functions for transform geometry.
//!
//! All functions here are pure and testable without any pixels. The
//! [`geometry`](super::geometry) module feeds their results into
//! [`PixelBuffer::resampled_copy`](super::PixelBuffer::resampled_copy).

use super::buffer::SourceRegion;
use crate::normalize::{CropMeasures, Size};

/// Target dimensions for a classic (aspect-preserving) resize.
///
/// The dimension matching the source's longer side is taken from `target`
/// and the other one is derived from the source ratio. Square sources take
/// the target height for both sides.
///
/// # Returns
/// * `None` when the source already has exactly the target size
///
/// ```text
/// 400x200 → max 100x100  ⇒  100x50
/// 200x400 → max 100x100  ⇒  50x100
/// 300x300 → 120x80       ⇒  80x80
/// ```
pub fn classic_resize_dimensions(current: (u32, u32), target: Size) -> Option<(u32, u32)> {
    let (cur_w, cur_h) = current;
    if (cur_w, cur_h) == (target.width, target.height) {
        return None;
    }

    let dims = if cur_w > cur_h {
        let h = cur_h as f64 * target.width as f64 / cur_w as f64;
        (target.width, h as u32)
    } else if cur_w < cur_h {
        let w = cur_w as f64 * target.height as f64 / cur_h as f64;
        (w as u32, target.height)
    } else {
        (target.height, target.height)
    };
    Some((dims.0.max(1), dims.1.max(1)))
}

/// Target dimensions for a reduce ("resizemin") operation.
///
/// Shrinks the image so it fits inside `target`, keeping its ratio.
///
/// # Returns
/// * `None` when the image already fits (both sides strictly smaller) or
///   the scale ratio is exactly one
pub fn reduce_dimensions(current: (u32, u32), target: Size) -> Option<(u32, u32)> {
    let (cur_w, cur_h) = current;
    if cur_w < target.width && cur_h < target.height {
        return None;
    }

    let ratio_x = cur_w as f64 / target.width as f64;
    let ratio_y = cur_h as f64 / target.height as f64;
    let ratio = ratio_x.max(ratio_y);
    if ratio == 1.0 {
        return None;
    }

    let w = (cur_w as f64 / ratio) as u32;
    let h = (cur_h as f64 / ratio) as u32;
    Some((w.max(1), h.max(1)))
}

/// Source region for a centered `target`-sized window.
///
/// Offsets go negative when the window is larger than the image; the
/// resulting region then overhangs the source on every side.
pub fn center_crop_region(current: (u32, u32), target: Size) -> SourceRegion {
    let start_x = ((current.0 as f64 - target.width as f64) / 2.0).trunc();
    let start_y = ((current.1 as f64 - target.height as f64) / 2.0).trunc();
    SourceRegion::new(
        start_x,
        start_y,
        target.width as f64,
        target.height as f64,
    )
}

/// Source region for resize-then-crop-to-fill.
///
/// Picks the largest centered region of the source with the target's aspect
/// ratio: a horizontal crop when the target is relatively taller, otherwise a
/// vertical one. The region is never narrower than one source pixel.
pub fn resize_crop_region(current: (u32, u32), target: Size) -> SourceRegion {
    let (cur_w, cur_h) = (current.0 as f64, current.1 as f64);
    let (tgt_w, tgt_h) = (target.width as f64, target.height as f64);
    let ratio_x = tgt_w / cur_w;
    let ratio_y = tgt_h / cur_h;

    if ratio_x < ratio_y {
        let src_w = (tgt_w / ratio_y).round().clamp(1.0, cur_w);
        let start_x = ((cur_w - src_w) / 2.0).round();
        SourceRegion::new(start_x, 0.0, src_w, cur_h)
    } else {
        let src_h = (tgt_h / ratio_x).round().clamp(1.0, cur_h);
        let start_y = ((cur_h - src_h) / 2.0).round();
        SourceRegion::new(0.0, start_y, cur_w, src_h)
    }
}

/// Bounding box of a `width`×`height` image rotated by `degrees`.
///
/// Quarter turns are exact; other angles grow the box to hold every corner.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized % 90.0 == 0.0 {
        return if (normalized / 90.0) as u32 % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }
    let (sin, cos) = normalized.to_radians().sin_cos();
    let (w, h) = (width as f64, height as f64);
    let bw = (w * cos.abs() + h * sin.abs() - 1e-9).ceil();
    let bh = (w * sin.abs() + h * cos.abs() - 1e-9).ceil();
    (bw.max(1.0) as u32, bh.max(1.0) as u32)
}

/// A crop rectangle mapped into another image's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledCrop {
    pub ox: i64,
    pub oy: i64,
    pub dx: i64,
    pub dy: i64,
    pub width: i64,
    pub height: i64,
}

/// Rescale crop corners measured on a `cropped` (smaller) image onto an
/// image of size `current`.
///
/// X coordinates scale by the width ratio, Y coordinates by the height ratio.
pub fn scale_crop_measures(
    current: (u32, u32),
    cropped: (u32, u32),
    measures: CropMeasures,
) -> ScaledCrop {
    let rate_w = current.0 as f64 / cropped.0 as f64;
    let rate_h = current.1 as f64 / cropped.1 as f64;
    let ox = (measures.ox as f64 * rate_w).round() as i64;
    let oy = (measures.oy as f64 * rate_h).round() as i64;
    let dx = (measures.dx as f64 * rate_w).round() as i64;
    let dy = (measures.dy as f64 * rate_h).round() as i64;
    ScaledCrop {
        ox,
        oy,
        dx,
        dy,
        width: dx - ox,
        height: dy - oy,
    }
}
