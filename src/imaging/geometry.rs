//! Geometric transforms.
//!
//! Every operation reads a [`PixelBuffer`] and allocates a fresh one; the
//! source is never modified, so a failing transform leaves the caller's
//! buffer intact. Resizes and crops go through
//! [`PixelBuffer::resampled_copy`]. Flips and quarter-turn rotations are
//! exact pixel permutations. Other angles sample the source bilinearly.
//!
//! Rotation angles are in degrees, positive values turning the image
//! clockwise.

use super::buffer::{PixelBuffer, SourceRegion};
use super::calculations::{
    center_crop_region, classic_resize_dimensions, reduce_dimensions, resize_crop_region,
    rotated_bounds,
};
use super::color::Color;
use crate::error::{Error, Result};
use crate::normalize::{CropRect, Flip, Size};
use image::{Rgba, RgbaImage, imageops};
use std::str::FromStr;

/// Resize policies selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Fit the longer side, derive the other (`classic`, `resize`).
    Classic,
    /// Shrink to fit inside the box, never enlarge past it (`reduce`, `resizemin`, `min`).
    Reduce,
    /// Centered window of exactly the requested size (`crop`).
    Crop,
    /// Fill the requested size, cropping the overflow (`resizecrop`).
    ResizeCrop,
}

impl FromStr for ResizeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "resize" => Ok(Self::Classic),
            "reduce" | "resizemin" | "min" => Ok(Self::Reduce),
            "crop" => Ok(Self::Crop),
            "resizecrop" => Ok(Self::ResizeCrop),
            _ => Err(Error::invalid(format!("Invalid resize type {s}."))),
        }
    }
}

/// EXIF orientation tag values (1–8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Out-of-range values are treated as [`Orientation::Normal`].
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }
}

fn require_area(size: Size, what: &str) -> Result<()> {
    if size.width == 0 || size.height == 0 {
        return Err(Error::invalid(format!(
            "{what} size must be positive, got {}x{}",
            size.width, size.height
        )));
    }
    Ok(())
}

/// Dispatch to one of the four resize policies.
pub fn resize(buffer: &PixelBuffer, mode: ResizeMode, size: Size) -> Result<Option<PixelBuffer>> {
    match mode {
        ResizeMode::Classic => classic_resize(buffer, size),
        ResizeMode::Reduce => reduce(buffer, size),
        ResizeMode::Crop => classic_crop(buffer, size).map(Some),
        ResizeMode::ResizeCrop => resize_crop(buffer, size).map(Some),
    }
}

/// Aspect-preserving resize. `None` when the size already matches.
pub fn classic_resize(buffer: &PixelBuffer, size: Size) -> Result<Option<PixelBuffer>> {
    require_area(size, "Resize")?;
    let current = buffer.dimensions();
    let Some((w, h)) = classic_resize_dimensions(current, size) else {
        return Ok(None);
    };
    tracing::debug!(from = ?current, to = ?(w, h), "classic resize");
    buffer
        .resampled_copy(w, h, SourceRegion::full(current.0, current.1))
        .map(Some)
}

/// Shrink to fit inside `size`. `None` when the image already fits.
pub fn reduce(buffer: &PixelBuffer, size: Size) -> Result<Option<PixelBuffer>> {
    require_area(size, "Reduce")?;
    let current = buffer.dimensions();
    let Some((w, h)) = reduce_dimensions(current, size) else {
        return Ok(None);
    };
    tracing::debug!(from = ?current, to = ?(w, h), "reduce");
    buffer
        .resampled_copy(w, h, SourceRegion::full(current.0, current.1))
        .map(Some)
}

/// Centered crop to exactly `size`. Area beyond the source stays transparent.
pub fn classic_crop(buffer: &PixelBuffer, size: Size) -> Result<PixelBuffer> {
    require_area(size, "Crop")?;
    let region = center_crop_region(buffer.dimensions(), size);
    tracing::debug!(?region, "center crop");
    buffer.resampled_copy(size.width, size.height, region)
}

/// Resize to cover `size`, cropping the overflow around the center.
pub fn resize_crop(buffer: &PixelBuffer, size: Size) -> Result<PixelBuffer> {
    require_area(size, "Resize-crop")?;
    let region = resize_crop_region(buffer.dimensions(), size);
    tracing::debug!(?region, to = ?(size.width, size.height), "resize crop");
    buffer.resampled_copy(size.width, size.height, region)
}

/// Crop an arbitrary rectangle at 1:1 scale.
pub fn crop(buffer: &PixelBuffer, rect: CropRect) -> Result<PixelBuffer> {
    let region = SourceRegion::new(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    );
    tracing::debug!(?region, "crop");
    buffer.resampled_copy(rect.width, rect.height, region)
}

/// Mirror across an axis. `Both` equals a half turn.
pub fn flip(buffer: &PixelBuffer, axis: Flip) -> PixelBuffer {
    let src = buffer.as_rgba();
    PixelBuffer::from_rgba(match axis {
        Flip::Horizontal => imageops::flip_horizontal(src),
        Flip::Vertical => imageops::flip_vertical(src),
        Flip::Both => imageops::rotate180(src),
    })
}

/// Rotate clockwise by `degrees`, exposing `background` where the
/// rotated image no longer covers the (grown) bounding box.
pub fn rotate(buffer: &PixelBuffer, degrees: f64, background: Color) -> Result<PixelBuffer> {
    if !degrees.is_finite() {
        return Err(Error::invalid(format!("Invalid rotation angle {degrees}")));
    }
    let normalized = degrees.rem_euclid(360.0);
    let src = buffer.as_rgba();
    tracing::debug!(degrees, "rotate");

    if normalized % 90.0 == 0.0 {
        return Ok(PixelBuffer::from_rgba(match normalized as u32 {
            90 => imageops::rotate90(src),
            180 => imageops::rotate180(src),
            270 => imageops::rotate270(src),
            _ => src.clone(),
        }));
    }

    let (w, h) = buffer.dimensions();
    let (bw, bh) = rotated_bounds(w, h, normalized);
    let bg = background.to_rgba();
    let (sin, cos) = normalized.to_radians().sin_cos();
    let (src_cx, src_cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let (dst_cx, dst_cy) = (bw as f64 / 2.0, bh as f64 / 2.0);

    let out = RgbaImage::from_fn(bw, bh, |x, y| {
        let dx = x as f64 + 0.5 - dst_cx;
        let dy = y as f64 + 0.5 - dst_cy;
        // Inverse of the clockwise rotation in y-down coordinates.
        let sx = dx * cos + dy * sin + src_cx - 0.5;
        let sy = dy * cos - dx * sin + src_cy - 0.5;
        sample_bilinear(src, sx, sy, bg)
    });
    Ok(PixelBuffer::from_rgba(out))
}

/// Bilinear sample at a pixel-center coordinate; outside samples read `bg`.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64, bg: Rgba<u8>) -> Rgba<u8> {
    let (w, h) = (src.width() as f64, src.height() as f64);
    if x < -1.0 || y < -1.0 || x > w || y > h {
        return bg;
    }
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let fetch = |px: f64, py: f64| {
        if px < 0.0 || py < 0.0 || px >= w || py >= h {
            bg
        } else {
            *src.get_pixel(px as u32, py as u32)
        }
    };
    let taps = [
        (fetch(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (fetch(x0 + 1.0, y0), fx * (1.0 - fy)),
        (fetch(x0, y0 + 1.0), (1.0 - fx) * fy),
        (fetch(x0 + 1.0, y0 + 1.0), fx * fy),
    ];

    let mut premul = [0.0f64; 3];
    let mut alpha = 0.0;
    for (p, weight) in taps {
        let a = p[3] as f64 * weight;
        for (c, acc) in premul.iter_mut().enumerate() {
            *acc += p[c] as f64 * a;
        }
        alpha += a;
    }
    if alpha <= 0.0 {
        return bg;
    }
    Rgba([
        (premul[0] / alpha).round().clamp(0.0, 255.0) as u8,
        (premul[1] / alpha).round().clamp(0.0, 255.0) as u8,
        (premul[2] / alpha).round().clamp(0.0, 255.0) as u8,
        alpha.round().clamp(0.0, 255.0) as u8,
    ])
}

/// Undo the camera orientation so the image displays upright.
///
/// `None` for [`Orientation::Normal`].
pub fn auto_orientate(buffer: &PixelBuffer, orientation: Orientation) -> Result<Option<PixelBuffer>> {
    let bg = Color::TRANSPARENT;
    tracing::debug!(?orientation, "auto-orientate");
    let out = match orientation {
        Orientation::Normal => return Ok(None),
        Orientation::FlipHorizontal => flip(buffer, Flip::Horizontal),
        Orientation::Rotate180 => flip(buffer, Flip::Both),
        Orientation::FlipVertical => flip(buffer, Flip::Vertical),
        Orientation::Transpose => rotate(&flip(buffer, Flip::Horizontal), -90.0, bg)?,
        Orientation::Rotate90 => rotate(buffer, -90.0, bg)?,
        Orientation::Transverse => rotate(&flip(buffer, Flip::Horizontal), 90.0, bg)?,
        Orientation::Rotate270 => rotate(buffer, 90.0, bg)?,
    };
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, solid};

    #[test]
    fn resize_mode_names() {
        for name in ["classic", "Resize"] {
            assert_eq!(name.parse::<ResizeMode>().unwrap(), ResizeMode::Classic);
        }
        for name in ["reduce", "resizemin", "MIN"] {
            assert_eq!(name.parse::<ResizeMode>().unwrap(), ResizeMode::Reduce);
        }
        assert_eq!("crop".parse::<ResizeMode>().unwrap(), ResizeMode::Crop);
        assert_eq!("resizecrop".parse::<ResizeMode>().unwrap(), ResizeMode::ResizeCrop);
        assert!(matches!(
            "stretch".parse::<ResizeMode>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn classic_resize_preserves_ratio() {
        let out = classic_resize(&gradient(400, 200), Size::new(100, 100))
            .unwrap()
            .unwrap();
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn classic_resize_same_size_is_noop() {
        assert!(
            classic_resize(&gradient(40, 20), Size::new(40, 20))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn zero_target_fails() {
        assert!(classic_resize(&gradient(4, 4), Size::new(0, 0)).is_err());
        assert!(resize_crop(&gradient(4, 4), Size::new(0, 3)).is_err());
    }

    #[test]
    fn reduce_fitting_image_is_noop() {
        assert!(reduce(&gradient(100, 80), Size::new(200, 200)).unwrap().is_none());
    }

    #[test]
    fn resize_crop_exact_output() {
        let out = resize_crop(&gradient(400, 200), Size::new(100, 100)).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
    }

    #[test]
    fn resize_crop_extreme_aspect_still_fills_target() {
        let out = resize_crop(&gradient(1000, 10), Size::new(1, 100)).unwrap();
        assert_eq!(out.dimensions(), (1, 100));
        let out = resize_crop(&gradient(10, 1000), Size::new(100, 1)).unwrap();
        assert_eq!(out.dimensions(), (100, 1));
    }

    #[test]
    fn classic_crop_takes_center() {
        let src = gradient(10, 10);
        let out = classic_crop(&src, Size::new(4, 2)).unwrap();
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(3, 4));
    }

    #[test]
    fn classic_crop_larger_than_source_pads_transparent() {
        let src = solid(4, 4, Rgba([9, 9, 9, 255]));
        let out = classic_crop(&src, Size::new(8, 8)).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.get_pixel(0, 0).unwrap()[3], 0);
        assert_eq!(out.get_pixel(4, 4), Some(Rgba([9, 9, 9, 255])));
    }

    #[test]
    fn crop_copies_rectangle() {
        let src = gradient(20, 20);
        let out = crop(
            &src,
            CropRect {
                x: 5,
                y: 6,
                width: 3,
                height: 2,
            },
        )
        .unwrap();
        assert_eq!(out.get_pixel(2, 1), src.get_pixel(7, 7));
    }

    #[test]
    fn flip_is_an_involution() {
        let src = gradient(7, 5);
        for axis in [Flip::Horizontal, Flip::Vertical, Flip::Both] {
            assert_eq!(flip(&flip(&src, axis), axis), src);
        }
    }

    #[test]
    fn flip_horizontal_mirrors_columns() {
        let src = gradient(7, 5);
        let out = flip(&src, Flip::Horizontal);
        assert_eq!(out.get_pixel(0, 2), src.get_pixel(6, 2));
    }

    #[test]
    fn flip_both_equals_half_turn() {
        let src = gradient(7, 5);
        let turned = rotate(&src, 180.0, Color::TRANSPARENT).unwrap();
        assert_eq!(flip(&src, Flip::Both), turned);
    }

    #[test]
    fn quarter_turns_restore_dimensions_and_pixels() {
        let src = gradient(6, 3);
        let there = rotate(&src, 90.0, Color::TRANSPARENT).unwrap();
        assert_eq!(there.dimensions(), (3, 6));
        assert_eq!(rotate(&there, -90.0, Color::TRANSPARENT).unwrap(), src);
        assert_eq!(rotate(&there, 270.0, Color::TRANSPARENT).unwrap(), src);
    }

    #[test]
    fn positive_angle_turns_clockwise() {
        let src = gradient(6, 3);
        let out = rotate(&src, 90.0, Color::TRANSPARENT).unwrap();
        // bottom-left corner moves to top-left
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(0, 2));
        assert_eq!(out.get_pixel(2, 0), src.get_pixel(0, 0));

        let back = rotate(&src, -90.0, Color::TRANSPARENT).unwrap();
        assert_eq!(back.get_pixel(0, 0), src.get_pixel(5, 0));
    }

    #[test]
    fn oblique_rotation_turns_clockwise() {
        // Marker in the top-right quadrant lands in the bottom-right after 45° CW.
        let mut src = solid(21, 21, Rgba([0, 0, 0, 255]));
        for x in 14..20 {
            for y in 1..7 {
                src.as_rgba_mut().put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let out = rotate(&src, 45.0, Color::TRANSPARENT).unwrap();
        let (w, h) = out.dimensions();
        let (cx, cy) = (w / 2, h / 2);
        assert_eq!(out.get_pixel(cx + 10, cy), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(out.get_pixel(cx, cy - 10), Some(Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn oblique_rotation_grows_and_fills_background() {
        let src = solid(20, 10, Rgba([200, 10, 10, 255]));
        let out = rotate(&src, 30.0, Color::new(0, 0, 255, 0)).unwrap();
        assert_eq!(out.dimensions(), rotated_bounds(20, 10, 30.0));
        assert_eq!(out.get_pixel(0, 0), Some(Rgba([0, 0, 255, 255])));
        let (w, h) = out.dimensions();
        assert_eq!(out.get_pixel(w / 2, h / 2), Some(Rgba([200, 10, 10, 255])));
    }

    #[test]
    fn orientation_six_is_rotate_minus_ninety() {
        let src = gradient(6, 4);
        let oriented = auto_orientate(&src, Orientation::from_exif(6))
            .unwrap()
            .unwrap();
        assert_eq!(oriented, rotate(&src, -90.0, Color::TRANSPARENT).unwrap());
        assert_eq!(oriented.dimensions(), (4, 6));
    }

    #[test]
    fn orientation_table_matches_flip_and_rotate_sequences() {
        let src = gradient(6, 4);
        let bg = Color::TRANSPARENT;
        let mirrored = flip(&src, Flip::Horizontal);
        let expected = [
            (2, flip(&src, Flip::Horizontal)),
            (3, flip(&src, Flip::Both)),
            (4, flip(&src, Flip::Vertical)),
            (5, rotate(&mirrored, -90.0, bg).unwrap()),
            (6, rotate(&src, -90.0, bg).unwrap()),
            (7, rotate(&mirrored, 90.0, bg).unwrap()),
            (8, rotate(&src, 90.0, bg).unwrap()),
        ];
        for (tag, want) in expected {
            let got = auto_orientate(&src, Orientation::from_exif(tag))
                .unwrap()
                .unwrap();
            assert_eq!(got, want, "orientation {tag}");
        }
    }

    #[test]
    fn transpose_and_transverse_orientations() {
        let src = gradient(6, 4);
        // 5: mirror then quarter turn counter-clockwise swaps the axes.
        let t = auto_orientate(&src, Orientation::Transpose).unwrap().unwrap();
        assert_eq!(t.dimensions(), (4, 6));
        assert_eq!(t.get_pixel(1, 3), src.get_pixel(3, 1));

        // 7: mirror then quarter turn clockwise maps to the anti-diagonal.
        let tv = auto_orientate(&src, Orientation::Transverse).unwrap().unwrap();
        assert_eq!(tv.dimensions(), (4, 6));
        assert_eq!(tv.get_pixel(0, 0), src.get_pixel(5, 3));
    }

    #[test]
    fn normal_and_unknown_orientation_are_noops() {
        let src = gradient(3, 3);
        assert!(auto_orientate(&src, Orientation::from_exif(1)).unwrap().is_none());
        assert!(auto_orientate(&src, Orientation::from_exif(42)).unwrap().is_none());
    }
}
