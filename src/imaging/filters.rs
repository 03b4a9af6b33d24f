//! Per-pixel and neighborhood filters.
//!
//! Filters mutate the buffer in place and never change its size. Parameters
//! are clamped into their documented range before any pixel is touched.
//!
//! | Filter | Kind | Range |
//! |---|---|---|
//! | [`blur`] | 3×3 convolution, repeated | passes ≥ 1 |
//! | [`brightness`] | additive | -255..=255 |
//! | [`contrast`] | around mid-gray | -100..=100 (negative raises contrast) |
//! | [`smooth`] | 3×3 weighted mean | -15..=15 |
//! | [`grayscale`], [`negate`] | per pixel | none |
//! | [`edge_detection`], [`emboss`], [`mean_remove`] | 3×3 convolution | none |
//! | [`colorize`] | additive per channel | [`Color`] |
//! | [`pixelate`] | block replicate / average | block ≥ 1 |
//! | [`sepia`] | composite | alpha 0..=100 |
//! | [`vignette`] | multiplicative sine falloff | size 0..=10, level 0..=1 |

use super::buffer::PixelBuffer;
use super::color::{Color, MAX_TRANSPARENCY, alpha_to_transparency, transparency_to_alpha};
use crate::error::{Error, Result};
use crate::normalize::fit_in_range;
use image::{Rgba, RgbaImage, imageops};
use std::f64::consts::PI;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlurKind {
    #[default]
    Gaussian,
    /// Edge-preserving: neighbors weigh less the more they differ.
    Selective,
}

impl FromStr for BlurKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" => Ok(Self::Gaussian),
            "selective" => Ok(Self::Selective),
            _ => Err(Error::invalid(format!("Incorrect blur type \"{s}\""))),
        }
    }
}

type Kernel = [[f64; 3]; 3];

const GAUSSIAN: Kernel = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
const EDGE_DETECT: Kernel = [[-1.0, 0.0, -1.0], [0.0, 4.0, 0.0], [-1.0, 0.0, -1.0]];
const EMBOSS: Kernel = [[1.5, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, -1.5]];
const MEAN_REMOVAL: Kernel = [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]];

/// 3×3 convolution over RGB with edge clamping. Alpha is kept from the
/// center pixel.
fn convolve(buffer: &mut PixelBuffer, kernel: &Kernel, divisor: f64, offset: f64) {
    let divisor = if divisor == 0.0 { 1.0 } else { divisor };
    let src = buffer.as_rgba().clone();
    let (w, h) = src.dimensions();
    let out = buffer.as_rgba_mut();

    for y in 0..h {
        for x in 0..w {
            let mut sum = [0.0f64; 3];
            for (ky, row) in kernel.iter().enumerate() {
                let sy = (y as i64 + ky as i64 - 1).clamp(0, h as i64 - 1) as u32;
                for (kx, weight) in row.iter().enumerate() {
                    if *weight == 0.0 {
                        continue;
                    }
                    let sx = (x as i64 + kx as i64 - 1).clamp(0, w as i64 - 1) as u32;
                    let p = src.get_pixel(sx, sy);
                    for (c, acc) in sum.iter_mut().enumerate() {
                        *acc += p[c] as f64 * weight;
                    }
                }
            }
            let alpha = src.get_pixel(x, y)[3];
            let ch = |v: f64| (v / divisor + offset).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x, y, Rgba([ch(sum[0]), ch(sum[1]), ch(sum[2]), alpha]));
        }
    }
}

fn selective_blur_pass(buffer: &mut PixelBuffer) {
    let src = buffer.as_rgba().clone();
    let (w, h) = src.dimensions();
    let out = buffer.as_rgba_mut();

    for y in 0..h {
        for x in 0..w {
            let center = src.get_pixel(x, y);
            let mut sum = [0.0f64; 3];
            let mut weights = [0.0f64; 3];
            for dy in -1i64..=1 {
                let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as u32;
                for dx in -1i64..=1 {
                    let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as u32;
                    let p = src.get_pixel(sx, sy);
                    for c in 0..3 {
                        let diff = (center[c] as f64 - p[c] as f64).abs();
                        let weight = 1.0 - diff / 256.0;
                        sum[c] += p[c] as f64 * weight;
                        weights[c] += weight;
                    }
                }
            }
            let ch = |c: usize| (sum[c] / weights[c]).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x, y, Rgba([ch(0), ch(1), ch(2), center[3]]));
        }
    }
}

fn map_pixels(buffer: &mut PixelBuffer, f: impl Fn(Rgba<u8>) -> Rgba<u8>) {
    for p in buffer.as_rgba_mut().pixels_mut() {
        *p = f(*p);
    }
}

fn clamp_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Blur `passes` times (at least once).
pub fn blur(buffer: &mut PixelBuffer, kind: BlurKind, passes: u32) {
    let passes = fit_in_range(passes as f64, Some(1.0), None) as u32;
    for _ in 0..passes {
        match kind {
            BlurKind::Gaussian => convolve(buffer, &GAUSSIAN, 16.0, 0.0),
            BlurKind::Selective => selective_blur_pass(buffer),
        }
    }
}

/// Add `level` to every color channel.
pub fn brightness(buffer: &mut PixelBuffer, level: i32) {
    let level = fit_in_range(level as f64, Some(-255.0), Some(255.0));
    imageops::colorops::brighten_in_place(buffer.as_rgba_mut(), level as i32);
}

/// Scale channels around mid-gray. Negative levels raise contrast.
pub fn contrast(buffer: &mut PixelBuffer, level: i32) {
    let level = fit_in_range(level as f64, Some(-100.0), Some(100.0));
    let factor = ((100.0 - level) / 100.0).powi(2);
    let adjust = |c: u8| clamp_channel(((c as f64 / 255.0 - 0.5) * factor + 0.5) * 255.0);
    map_pixels(buffer, |p| Rgba([adjust(p[0]), adjust(p[1]), adjust(p[2]), p[3]]));
}

/// Weighted 3×3 mean; `level` is the center weight.
pub fn smooth(buffer: &mut PixelBuffer, level: i32) {
    let level = fit_in_range(level as f64, Some(-15.0), Some(15.0));
    let kernel = [[1.0, 1.0, 1.0], [1.0, level, 1.0], [1.0, 1.0, 1.0]];
    convolve(buffer, &kernel, level + 8.0, 0.0);
}

/// Luma-weighted grayscale.
pub fn grayscale(buffer: &mut PixelBuffer) {
    map_pixels(buffer, |p| {
        let y = (0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64) as u8;
        Rgba([y, y, y, p[3]])
    });
}

pub fn negate(buffer: &mut PixelBuffer) {
    imageops::invert(buffer.as_rgba_mut());
}

pub fn edge_detection(buffer: &mut PixelBuffer) {
    convolve(buffer, &EDGE_DETECT, 1.0, 127.0);
}

pub fn emboss(buffer: &mut PixelBuffer) {
    convolve(buffer, &EMBOSS, 1.0, 127.0);
}

pub fn mean_remove(buffer: &mut PixelBuffer) {
    convolve(buffer, &MEAN_REMOVAL, 1.0, 0.0);
}

/// Shift every pixel toward `color`: its channels are added on, and its
/// transparency is added to the pixel's.
pub fn colorize(buffer: &mut PixelBuffer, color: Color) {
    map_pixels(buffer, |p| {
        let transparency =
            (alpha_to_transparency(p[3]) as u32 + color.a as u32).min(MAX_TRANSPARENCY as u32);
        Rgba([
            p[0].saturating_add(color.r),
            p[1].saturating_add(color.g),
            p[2].saturating_add(color.b),
            if color.a == 0 {
                p[3]
            } else {
                transparency_to_alpha(transparency as u8)
            },
        ])
    });
}

/// Replace each `block_size`² tile with its top-left pixel, or with the
/// tile's alpha-weighted average when `advanced`.
pub fn pixelate(buffer: &mut PixelBuffer, block_size: u32, advanced: bool) {
    let block = fit_in_range(block_size as f64, Some(1.0), None) as u32;
    if block == 1 {
        return;
    }
    let img: &mut RgbaImage = buffer.as_rgba_mut();
    let (w, h) = img.dimensions();

    for by in (0..h).step_by(block as usize) {
        for bx in (0..w).step_by(block as usize) {
            let (ex, ey) = ((bx + block).min(w), (by + block).min(h));
            let fill = if advanced {
                let mut premul = [0.0f64; 3];
                let mut alpha = 0.0;
                let mut count = 0.0;
                for y in by..ey {
                    for x in bx..ex {
                        let p = img.get_pixel(x, y);
                        let a = p[3] as f64;
                        for (c, acc) in premul.iter_mut().enumerate() {
                            *acc += p[c] as f64 * a;
                        }
                        alpha += a;
                        count += 1.0;
                    }
                }
                if alpha > 0.0 {
                    Rgba([
                        clamp_channel(premul[0] / alpha),
                        clamp_channel(premul[1] / alpha),
                        clamp_channel(premul[2] / alpha),
                        clamp_channel(alpha / count),
                    ])
                } else {
                    *img.get_pixel(bx, by)
                }
            } else {
                *img.get_pixel(bx, by)
            };
            for y in by..ey {
                for x in bx..ex {
                    img.put_pixel(x, y, fill);
                }
            }
        }
    }
}

/// Sepia tone: grayscale → contrast(-3) → brightness(-15) → colorize
/// `(100, 70, 50)` with the given transparency.
pub fn sepia(buffer: &mut PixelBuffer, alpha: u8) {
    let alpha = fit_in_range(alpha as f64, Some(0.0), Some(100.0)) as u8;
    grayscale(buffer);
    contrast(buffer, -3);
    brightness(buffer, -15);
    colorize(buffer, Color::new(100, 70, 50, alpha));
}

/// Darken toward the corners.
///
/// For pixel `(x, y)`: `l = (sin(πx/w)·sin(πy/h))^size`, then every color
/// channel is multiplied by `1 - level·(1 - l)`. Alpha is untouched.
pub fn vignette(buffer: &mut PixelBuffer, size: f64, level: f64) {
    let size = fit_in_range(size, Some(0.0), Some(10.0));
    let level = fit_in_range(level, Some(0.0), Some(1.0));
    let img = buffer.as_rgba_mut();
    let (w, h) = (img.width() as f64, img.height() as f64);

    for (x, y, p) in img.enumerate_pixels_mut() {
        let l = ((PI / w * x as f64).sin() * (PI / h * y as f64).sin())
            .max(0.0)
            .powf(size);
        let factor = 1.0 - level * (1.0 - l);
        for c in 0..3 {
            p[c] = clamp_channel(p[c] as f64 * factor);
        }
    }
}
