//! Overlay a watermark image onto a base buffer.
//!
//! The overlay is scaled by [`WatermarkSize`], anchored by [`Position`]
//! (percentages of the free space, or explicit pixels), shifted by a
//! [`Margin`] and alpha-composited with `imageops::overlay`.

use super::buffer::{PixelBuffer, SourceRegion};
use crate::error::Result;
use crate::normalize::{Margin, Position, WatermarkSize};
use image::imageops;

/// Placement settings for a watermark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOptions {
    pub position: Position,
    /// `None` keeps the overlay's own size.
    pub size: Option<WatermarkSize>,
    pub margin: Margin,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            position: Position::Percent { x: 50.0, y: 50.0 },
            size: None,
            margin: Margin::default(),
        }
    }
}

/// Size of the overlay once scaled for a `base`-sized image.
pub fn overlay_dimensions(
    base: (u32, u32),
    mark: (u32, u32),
    size: Option<WatermarkSize>,
) -> (u32, u32) {
    let (bw, bh) = (base.0 as f64, base.1 as f64);
    let (mw, mh) = (mark.0 as f64, mark.1 as f64);
    let (w, h) = match size {
        None => return mark,
        Some(WatermarkSize::Exact(s)) => (s.width as f64, s.height as f64),
        Some(WatermarkSize::Percent(p)) => {
            let w = bw * p / 100.0;
            (w, w * mh / mw)
        }
        Some(WatermarkSize::Full) => {
            let scale = (bw / mw).min(bh / mh);
            (mw * scale, mh * scale)
        }
    };
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Top-left corner of the overlay on the base image.
pub fn overlay_origin(
    base: (u32, u32),
    mark: (u32, u32),
    position: Position,
    margin: Margin,
) -> (i64, i64) {
    let (x, y) = match position {
        Position::Pixels { x, y } => (x, y),
        Position::Percent { x, y } => {
            let free_x = base.0 as f64 - mark.0 as f64;
            let free_y = base.1 as f64 - mark.1 as f64;
            (
                (free_x * x / 100.0).round() as i64,
                (free_y * y / 100.0).round() as i64,
            )
        }
    };
    (x + margin.x, y + margin.y)
}

/// Composite `mark` onto a copy of `base`.
///
/// # Returns
/// * `None` when the placed overlay does not intersect the base image
pub fn apply(
    base: &PixelBuffer,
    mark: &PixelBuffer,
    options: &WatermarkOptions,
) -> Result<Option<PixelBuffer>> {
    let (w, h) = overlay_dimensions(base.dimensions(), mark.dimensions(), options.size);
    let (x, y) = overlay_origin(base.dimensions(), (w, h), options.position, options.margin);

    let (bw, bh) = base.dimensions();
    if x >= bw as i64 || y >= bh as i64 || x + w as i64 <= 0 || y + h as i64 <= 0 {
        tracing::debug!(x, y, w, h, "watermark outside image, skipped");
        return Ok(None);
    }

    let scaled;
    let overlay = if (w, h) == mark.dimensions() {
        mark
    } else {
        let (mw, mh) = mark.dimensions();
        scaled = mark.resampled_copy(w, h, SourceRegion::full(mw, mh))?;
        &scaled
    };

    let mut out = base.clone();
    imageops::overlay(out.as_rgba_mut(), overlay.as_rgba(), x, y);
    tracing::debug!(x, y, w, h, "watermark applied");
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Size;
    use crate::test_helpers::solid;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    // =========================================================================
    // overlay_dimensions
    // =========================================================================

    #[test]
    fn no_size_keeps_overlay_size() {
        assert_eq!(overlay_dimensions((200, 100), (30, 10), None), (30, 10));
    }

    #[test]
    fn percent_follows_base_width_and_overlay_ratio() {
        assert_eq!(
            overlay_dimensions((200, 100), (50, 25), Some(WatermarkSize::Percent(50.0))),
            (100, 50)
        );
    }

    #[test]
    fn full_fits_inside_base() {
        assert_eq!(
            overlay_dimensions((200, 100), (50, 50), Some(WatermarkSize::Full)),
            (100, 100)
        );
    }

    #[test]
    fn exact_size_is_taken_verbatim() {
        assert_eq!(
            overlay_dimensions(
                (200, 100),
                (50, 50),
                Some(WatermarkSize::Exact(Size::new(10, 40)))
            ),
            (10, 40)
        );
    }

    // =========================================================================
    // overlay_origin
    // =========================================================================

    #[test]
    fn percent_positions_split_free_space() {
        let base = (200, 100);
        let mark = (50, 20);
        let origin = |x, y| overlay_origin(base, mark, Position::Percent { x, y }, Margin::default());
        assert_eq!(origin(0.0, 0.0), (0, 0));
        assert_eq!(origin(50.0, 50.0), (75, 40));
        assert_eq!(origin(100.0, 100.0), (150, 80));
    }

    #[test]
    fn margin_shifts_origin() {
        let origin = overlay_origin(
            (200, 100),
            (50, 20),
            Position::Percent { x: 100.0, y: 100.0 },
            Margin { x: -10, y: -5 },
        );
        assert_eq!(origin, (140, 75));
    }

    // =========================================================================
    // apply
    // =========================================================================

    #[test]
    fn overlay_is_composited_at_origin() {
        let base = solid(20, 20, WHITE);
        let mark = solid(5, 5, BLACK);
        let opts = WatermarkOptions {
            position: Position::Pixels { x: 2, y: 3 },
            ..Default::default()
        };
        let out = apply(&base, &mark, &opts).unwrap().unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(out.get_pixel(2, 3), Some(BLACK));
        assert_eq!(out.get_pixel(6, 7), Some(BLACK));
        assert_eq!(out.get_pixel(7, 8), Some(WHITE));
        assert_eq!(out.get_pixel(1, 3), Some(WHITE));
    }

    #[test]
    fn transparent_overlay_pixels_leave_base() {
        let base = solid(4, 4, WHITE);
        let mark = solid(4, 4, Rgba([0, 0, 0, 0]));
        let out = apply(&base, &mark, &WatermarkOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn overlay_fully_outside_is_noop() {
        let base = solid(10, 10, WHITE);
        let mark = solid(3, 3, BLACK);
        let opts = WatermarkOptions {
            position: Position::Pixels { x: 10, y: 0 },
            ..Default::default()
        };
        assert!(apply(&base, &mark, &opts).unwrap().is_none());
    }

    #[test]
    fn partially_outside_overlay_is_clipped() {
        let base = solid(10, 10, WHITE);
        let mark = solid(4, 4, BLACK);
        let opts = WatermarkOptions {
            position: Position::Pixels { x: -2, y: -2 },
            ..Default::default()
        };
        let out = apply(&base, &mark, &opts).unwrap().unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(BLACK));
        assert_eq!(out.get_pixel(1, 1), Some(BLACK));
        assert_eq!(out.get_pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn scaled_overlay_covers_target_area() {
        let base = solid(100, 50, WHITE);
        let mark = solid(10, 10, BLACK);
        let opts = WatermarkOptions {
            position: Position::Pixels { x: 0, y: 0 },
            size: Some(WatermarkSize::Percent(20.0)),
            margin: Margin::default(),
        };
        let out = apply(&base, &mark, &opts).unwrap().unwrap();
        assert_eq!(out.get_pixel(19, 19), Some(BLACK));
        assert_eq!(out.get_pixel(20, 20), Some(WHITE));
    }
}
