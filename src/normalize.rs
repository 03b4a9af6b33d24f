//! Parameter normalization.
//!
//! Callers describe geometry and colors in whatever shape is handy: a bare
//! number, an ordered list, or a keyed table using one of several accepted
//! spellings. Every entry point here takes the tagged [`Args`] input and
//! returns one canonical, strongly-typed value, or fails with
//! [`Error::InvalidArgument`] naming the offending parameter.
//!
//! | Entry point | Output | Accepted keys |
//! |---|---|---|
//! | [`size`] | [`Size`] | `width`/`w`/`x`, `height`/`h`/`y` |
//! | [`crop`] | [`CropRect`] | `x`, `y`, `width`/`w`, `height`/`h` |
//! | [`crop_measures`] | [`CropMeasures`] | `ox`, `oy`, `dx`, `dy` |
//! | [`color`] | [`Color`] | `red`/`r`, `green`/`g`, `blue`/`b`, `alpha`/`a` |
//! | [`css_position`] | [`Position`] | `x`, `y` |
//! | [`watermark_size`] | [`WatermarkSize`] | `width`/`w`, `height`/`h` |
//! | [`margin`], [`position`] | [`Margin`], [`Point`] | `x`, `y` |
//!
//! `Args` deserializes from the same shapes (number, string, array, table),
//! which is what lets [`recipe`](crate::recipe) files carry parameters
//! verbatim.

use crate::error::{Error, Result};
use crate::imaging::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One user-supplied value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Number(f64),
    Text(String),
}

impl Param {
    /// Numeric view of the value. Numeric strings count as numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Param::Number(n) if n.is_finite() => Some(*n),
            Param::Number(_) => None,
            Param::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Param::Text(s) => Some(s),
            Param::Number(_) => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Number(n) => write!(f, "{n}"),
            Param::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

macro_rules! param_from_number {
    ($($t:ty),*) => {$(
        impl From<$t> for Param {
            fn from(value: $t) -> Self {
                Param::Number(value as f64)
            }
        }

        impl From<$t> for Args {
            fn from(value: $t) -> Self {
                Args::Positional(vec![Param::from(value)])
            }
        }

        impl<const N: usize> From<[$t; N]> for Args {
            fn from(values: [$t; N]) -> Self {
                Args::positional(values)
            }
        }
    )*};
}

param_from_number!(f64, f32, i32, i64, u32);

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

/// Flexible parameter input: positional values or a keyed record.
///
/// A single scalar is represented as a one-element positional list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawArgs")]
pub enum Args {
    Positional(Vec<Param>),
    Keyed(BTreeMap<String, Param>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArgs {
    One(Param),
    Many(Vec<Param>),
    Keyed(BTreeMap<String, Param>),
}

impl From<RawArgs> for Args {
    fn from(raw: RawArgs) -> Self {
        match raw {
            RawArgs::One(p) => Args::Positional(vec![p]),
            RawArgs::Many(v) => Args::Positional(v),
            RawArgs::Keyed(m) => Args::Keyed(m),
        }
    }
}

impl Args {
    pub fn positional<I, P>(values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        Args::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn keyed<I, K, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Param>,
    {
        Args::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First matching key, in the order the spellings are given.
    fn lookup(&self, keys: &[&str]) -> Option<&Param> {
        match self {
            Args::Keyed(map) => keys.iter().find_map(|k| map.get(*k)),
            Args::Positional(_) => None,
        }
    }

    fn number_at(&self, index: usize, keys: &[&str]) -> Option<f64> {
        match self {
            Args::Positional(values) => values.get(index).and_then(Param::as_number),
            Args::Keyed(_) => self.lookup(keys).and_then(Param::as_number),
        }
    }

    /// The lone text token, if the input is exactly one string.
    fn single_text(&self) -> Option<&str> {
        match self {
            Args::Positional(values) if values.len() == 1 => values[0].as_text(),
            _ => None,
        }
    }
}

impl From<&str> for Args {
    fn from(value: &str) -> Self {
        Args::Positional(vec![Param::from(value)])
    }
}

impl From<String> for Args {
    fn from(value: String) -> Self {
        Args::Positional(vec![Param::from(value)])
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Args::Positional(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Args::Keyed(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

// =========================================================================
// Canonical output types
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// A crop expressed as origin and destination corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropMeasures {
    pub ox: i64,
    pub oy: i64,
    pub dx: i64,
    pub dy: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flip {
    Horizontal,
    Vertical,
    Both,
}

impl FromStr for Flip {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        flip(s)
    }
}

/// Placement of an overlay inside an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Percentages of the free space along each axis (0 = left/top, 100 = right/bottom).
    Percent { x: f64, y: f64 },
    /// Absolute pixel offsets from the top-left corner.
    Pixels { x: i64, y: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatermarkSize {
    /// Percentage of the base image's width, aspect ratio preserved.
    Percent(f64),
    /// As large as fits inside the base image, aspect ratio preserved.
    Full,
    Exact(Size),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margin {
    pub x: i64,
    pub y: i64,
}

// =========================================================================
// Normalizers
// =========================================================================

const WIDTH_KEYS: &[&str] = &["width", "w", "x"];
const HEIGHT_KEYS: &[&str] = &["height", "h", "y"];

/// Normalize a width/height pair.
///
/// A single value yields a square. Negative values clamp to zero.
pub fn size(args: &Args) -> Result<Size> {
    let width = args
        .number_at(0, WIDTH_KEYS)
        .ok_or_else(|| Error::invalid(format!("Invalid size arguments {args}")))?;
    let height = args.number_at(1, HEIGHT_KEYS).unwrap_or(width);
    Ok(Size {
        width: to_dimension(width),
        height: to_dimension(height),
    })
}

fn to_dimension(value: f64) -> u32 {
    value.max(0.0).round().min(u32::MAX as f64) as u32
}

/// Normalize an arbitrary-origin crop rectangle. All four values are required.
pub fn crop(args: &Args) -> Result<CropRect> {
    let values = [
        args.number_at(0, &["x"]),
        args.number_at(1, &["y"]),
        args.number_at(2, &["width", "w"]),
        args.number_at(3, &["height", "h"]),
    ];
    let [Some(x), Some(y), Some(w), Some(h)] = values else {
        return Err(Error::invalid(format!("Invalid crop arguments {args}")));
    };
    if w <= 0.0 || h <= 0.0 {
        return Err(Error::invalid(format!(
            "Crop width and height must be positive, got {w}x{h}"
        )));
    }
    Ok(CropRect {
        x: x.round() as i64,
        y: y.round() as i64,
        width: to_dimension(w),
        height: to_dimension(h),
    })
}

/// Normalize crop corners. Requires `dx > ox` and `dy > oy`.
pub fn crop_measures(args: &Args) -> Result<CropMeasures> {
    let values = [
        args.number_at(0, &["ox"]),
        args.number_at(1, &["oy"]),
        args.number_at(2, &["dx"]),
        args.number_at(3, &["dy"]),
    ];
    let [Some(ox), Some(oy), Some(dx), Some(dy)] = values else {
        return Err(Error::invalid(format!("Invalid crop measures {args}")));
    };
    if dx <= ox || dy <= oy {
        return Err(Error::invalid(format!(
            "Destination must lie past origin (ox={ox}, oy={oy}, dx={dx}, dy={dy})"
        )));
    }
    Ok(CropMeasures {
        ox: ox.round() as i64,
        oy: oy.round() as i64,
        dx: dx.round() as i64,
        dy: dy.round() as i64,
    })
}

/// Parse a flip axis name, case-insensitively.
pub fn flip(axis: &str) -> Result<Flip> {
    match axis.trim().to_ascii_lowercase().as_str() {
        "x" | "h" | "horizontal" => Ok(Flip::Horizontal),
        "y" | "v" | "vertical" => Ok(Flip::Vertical),
        "b" | "both" => Ok(Flip::Both),
        _ => Err(Error::invalid(format!("Incorrect flip type \"{axis}\""))),
    }
}

/// Normalize a color.
///
/// Accepts the `-1` transparent sentinel, `[r, g, b]` / `[r, g, b, a]`,
/// a keyed record with long or short channel names, or a hex string of
/// 3, 4, 6 or 8 digits.
pub fn color(args: &Args) -> Result<Color> {
    if let Some(hex) = args.single_text() {
        return Color::from_hex(hex);
    }
    match args {
        Args::Positional(values) if values.len() == 1 => match values[0].as_number() {
            Some(n) if n == -1.0 => Ok(Color::TRANSPARENT),
            _ => Err(Error::invalid(format!("Invalid color {args}"))),
        },
        Args::Positional(values) if values.len() == 3 || values.len() == 4 => {
            let channels: Option<Vec<f64>> = values.iter().map(Param::as_number).collect();
            let channels = channels.ok_or_else(|| Error::invalid(format!("Invalid color {args}")))?;
            Ok(Color::new(
                channel(channels[0]),
                channel(channels[1]),
                channel(channels[2]),
                channels.get(3).copied().map(channel).unwrap_or(0),
            ))
        }
        Args::Keyed(_) => {
            let get = |keys: &[&str]| args.lookup(keys).and_then(Param::as_number);
            let (Some(r), Some(g), Some(b)) = (
                get(&["red", "r"]),
                get(&["green", "g"]),
                get(&["blue", "b"]),
            ) else {
                return Err(Error::invalid(format!("Invalid color {args}")));
            };
            let a = get(&["alpha", "a"]).unwrap_or(0.0);
            Ok(Color::new(channel(r), channel(g), channel(b), channel(a)))
        }
        Args::Positional(_) => Err(Error::invalid(format!("Invalid color {args}"))),
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Clamp `value` into `[min, max]`. `None` disables that bound.
pub fn fit_in_range(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = match min {
        Some(min) if value < min => min,
        _ => value,
    };
    match max {
        Some(max) if value > max => max,
        _ => value,
    }
}

/// Normalize a CSS-like position.
///
/// A keyword token (`"top left"`, `"center"`, `"bottom"`, ...) maps to
/// percentages; numeric input is taken as pixel offsets, `y` defaulting to `x`.
pub fn css_position(args: &Args) -> Result<Position> {
    if let Some(token) = args.single_text()
        && token.trim().parse::<f64>().is_err()
    {
        return keyword_position(token)
            .ok_or_else(|| Error::invalid(format!("Invalid watermark position {token}.")));
    }
    let point = position(args)?;
    Ok(Position::Pixels {
        x: point.x,
        y: point.y,
    })
}

fn keyword_position(token: &str) -> Option<Position> {
    let words: Vec<String> = token
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    let (x, y) = match words.as_slice() {
        [one] => match one.as_str() {
            "center" | "centered" => (50.0, 50.0),
            "top" => (50.0, 0.0),
            "bottom" => (50.0, 100.0),
            "left" => (0.0, 50.0),
            "right" => (100.0, 50.0),
            _ => return None,
        },
        [a, b] => {
            // Vertical keyword first is canonical, but either order is accepted.
            let vertical = |w: &str| match w {
                "top" => Some(0.0),
                "center" => Some(50.0),
                "bottom" => Some(100.0),
                _ => None,
            };
            let horizontal = |w: &str| match w {
                "left" => Some(0.0),
                "center" => Some(50.0),
                "right" => Some(100.0),
                _ => None,
            };
            match (vertical(a), horizontal(b)) {
                (Some(y), Some(x)) => (x, y),
                _ => (horizontal(a)?, vertical(b)?),
            }
        }
        _ => return None,
    };
    Some(Position::Percent { x, y })
}

/// Normalize an overlay size: `"NN%"`, `"full"`, or numeric dimensions.
pub fn watermark_size(args: &Args) -> Result<WatermarkSize> {
    if let Some(token) = args.single_text() {
        let token = token.trim();
        if token.eq_ignore_ascii_case("full") {
            return Ok(WatermarkSize::Full);
        }
        if let Some(percent) = token.strip_suffix('%')
            && let Ok(p) = percent.trim().parse::<f64>()
            && p.is_finite()
            && p > 0.0
        {
            return Ok(WatermarkSize::Percent(p));
        }
        if token.parse::<f64>().is_err() {
            return Err(Error::invalid(format!("Invalid size arguments {args}")));
        }
    }
    size(args).map(WatermarkSize::Exact)
}

/// Normalize a margin: signed pixel offsets, `y` defaulting to `x`.
pub fn margin(args: &Args) -> Result<Margin> {
    let x = args
        .number_at(0, &["x"])
        .ok_or_else(|| Error::invalid(format!("Invalid margin {args}.")))?;
    let y = args.number_at(1, &["y"]).unwrap_or(x);
    Ok(Margin {
        x: x.round() as i64,
        y: y.round() as i64,
    })
}

/// Normalize a numeric point, `y` defaulting to `x`.
pub fn position(args: &Args) -> Result<Point> {
    let x = args
        .number_at(0, &["x"])
        .ok_or_else(|| Error::invalid(format!("Invalid position {args}.")))?;
    let y = match args.number_at(1, &["y"]) {
        Some(y) => y,
        None if matches!(args, Args::Positional(v) if v.len() > 1) => {
            return Err(Error::invalid(format!("Invalid position {args}.")));
        }
        None => x,
    };
    Ok(Point {
        x: x.round() as i64,
        y: y.round() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(Error::InvalidArgument(_)))
    }

    // =========================================================================
    // size
    // =========================================================================

    #[test]
    fn size_accepts_every_shape() {
        let expected = Size::new(250, 320);
        assert_eq!(size(&Args::from([250, 320])).unwrap(), expected);
        assert_eq!(
            size(&Args::keyed([("width", 250), ("height", 320)])).unwrap(),
            expected
        );
        assert_eq!(size(&Args::keyed([("w", 250), ("h", 320)])).unwrap(), expected);
        assert_eq!(size(&Args::keyed([("x", 250), ("y", 320)])).unwrap(), expected);
    }

    #[test]
    fn size_single_value_is_square() {
        assert_eq!(size(&Args::from(250)).unwrap(), Size::new(250, 250));
        assert_eq!(
            size(&Args::keyed([("width", 250)])).unwrap(),
            Size::new(250, 250)
        );
    }

    #[test]
    fn size_negative_clamps_to_zero() {
        assert_eq!(size(&Args::from(-200)).unwrap(), Size::new(0, 0));
    }

    #[test]
    fn size_without_values_fails() {
        assert!(is_invalid(size(&Args::Positional(vec![]))));
        assert!(is_invalid(size(&Args::keyed([("depth", 3)]))));
    }

    // =========================================================================
    // crop / crop_measures
    // =========================================================================

    #[test]
    fn crop_accepts_every_shape() {
        let expected = CropRect {
            x: 23,
            y: 32,
            width: 200,
            height: 150,
        };
        assert_eq!(crop(&Args::from([23, 32, 200, 150])).unwrap(), expected);
        assert_eq!(
            crop(&Args::keyed([("x", 23), ("y", 32), ("width", 200), ("height", 150)])).unwrap(),
            expected
        );
        assert_eq!(
            crop(&Args::keyed([("x", 23), ("y", 32), ("w", 200), ("h", 150)])).unwrap(),
            expected
        );
    }

    #[test]
    fn crop_with_missing_values_fails() {
        assert!(is_invalid(crop(&Args::from(23))));
        assert!(is_invalid(crop(&Args::from([23, 32, 200]))));
    }

    #[test]
    fn crop_measures_accepts_every_shape() {
        let expected = CropMeasures {
            ox: 23,
            oy: 32,
            dx: 46,
            dy: 64,
        };
        assert_eq!(crop_measures(&Args::from([23, 32, 46, 64])).unwrap(), expected);
        assert_eq!(
            crop_measures(&Args::keyed([("ox", 23), ("oy", 32), ("dx", 46), ("dy", 64)]))
                .unwrap(),
            expected
        );
    }

    #[test]
    fn crop_measures_rejects_inverted_corners() {
        assert!(is_invalid(crop_measures(&Args::keyed([
            ("ox", 46),
            ("oy", 56),
            ("dx", 40),
        ]))));
        assert!(is_invalid(crop_measures(&Args::from([46, 56, 40, 80]))));
        assert!(is_invalid(crop_measures(&Args::from([10, 56, 40, 20]))));
    }

    // =========================================================================
    // flip
    // =========================================================================

    #[test]
    fn flip_names() {
        for name in ["x", "h", "horizontal", "HORIZONTAL"] {
            assert_eq!(flip(name).unwrap(), Flip::Horizontal);
        }
        for name in ["y", "v", "Vertical"] {
            assert_eq!(flip(name).unwrap(), Flip::Vertical);
        }
        for name in ["b", "both"] {
            assert_eq!(flip(name).unwrap(), Flip::Both);
        }
        assert_eq!("v".parse::<Flip>().unwrap(), Flip::Vertical);
    }

    #[test]
    fn flip_unknown_fails() {
        assert!(is_invalid(flip("fail")));
    }

    // =========================================================================
    // color
    // =========================================================================

    #[test]
    fn color_accepts_every_shape() {
        let expected = Color::new(0, 0, 0, 127);
        assert_eq!(color(&Args::from(-1)).unwrap(), expected);
        assert_eq!(color(&Args::from([0, 0, 0, 127])).unwrap(), expected);
        assert_eq!(
            color(&Args::keyed([("red", 0), ("green", 0), ("blue", 0), ("alpha", 127)])).unwrap(),
            expected
        );
        assert_eq!(
            color(&Args::keyed([("r", 0), ("g", 0), ("b", 0), ("a", 127)])).unwrap(),
            expected
        );
        assert_eq!(color(&Args::from("#0000007F")).unwrap(), expected);
        assert_eq!(color(&Args::from("#0007")).unwrap(), Color::new(0, 0, 0, 119));
    }

    #[test]
    fn color_triple_is_opaque() {
        assert_eq!(
            color(&Args::from([10, 20, 300])).unwrap(),
            Color::new(10, 20, 255, 0)
        );
    }

    #[test]
    fn color_rejects_bad_input() {
        assert!(is_invalid(color(&Args::from("#33333"))));
        assert!(is_invalid(color(&Args::from([1, 2]))));
        assert!(is_invalid(color(&Args::from(5))));
        assert!(is_invalid(color(&Args::keyed([("r", 1), ("g", 2)]))));
    }

    // =========================================================================
    // fit_in_range
    // =========================================================================

    #[test]
    fn fit_in_range_bounds() {
        assert_eq!(fit_in_range(5.0, Some(0.0), Some(23.0)), 5.0);
        assert_eq!(fit_in_range(23.0, Some(0.0), Some(23.0)), 23.0);
        assert_eq!(fit_in_range(121.0, Some(0.0), Some(23.0)), 23.0);
        assert_eq!(fit_in_range(-121.0, Some(0.0), Some(23.0)), 0.0);
    }

    #[test]
    fn fit_in_range_open_bounds() {
        assert_eq!(fit_in_range(121.0, Some(0.0), None), 121.0);
        assert_eq!(fit_in_range(-121.0, Some(0.0), None), 0.0);
        assert_eq!(fit_in_range(121.0, None, Some(0.0)), 0.0);
        assert_eq!(fit_in_range(-121.0, None, Some(0.0)), -121.0);
    }

    // =========================================================================
    // positions, sizes and margins for overlays
    // =========================================================================

    #[test]
    fn css_position_keywords() {
        let center = Position::Percent { x: 50.0, y: 50.0 };
        assert_eq!(css_position(&Args::from("center")).unwrap(), center);
        assert_eq!(css_position(&Args::from("centered")).unwrap(), center);
        assert_eq!(css_position(&Args::from("center center")).unwrap(), center);
        assert_eq!(
            css_position(&Args::from("top left")).unwrap(),
            Position::Percent { x: 0.0, y: 0.0 }
        );
        assert_eq!(
            css_position(&Args::from("right bottom")).unwrap(),
            Position::Percent { x: 100.0, y: 100.0 }
        );
        assert_eq!(
            css_position(&Args::from("bottom")).unwrap(),
            Position::Percent { x: 50.0, y: 100.0 }
        );
    }

    #[test]
    fn css_position_numeric() {
        let expected = Position::Pixels { x: 23, y: 23 };
        assert_eq!(css_position(&Args::from(23)).unwrap(), expected);
        assert_eq!(css_position(&Args::keyed([("x", 23)])).unwrap(), expected);
        assert_eq!(
            css_position(&Args::from([23, 32])).unwrap(),
            Position::Pixels { x: 23, y: 32 }
        );
    }

    #[test]
    fn css_position_unknown_token_fails() {
        assert!(is_invalid(css_position(&Args::from("fail"))));
        assert!(is_invalid(css_position(&Args::from("not valid"))));
    }

    #[test]
    fn watermark_size_shapes() {
        assert_eq!(
            watermark_size(&Args::from("50%")).unwrap(),
            WatermarkSize::Percent(50.0)
        );
        assert_eq!(watermark_size(&Args::from("full")).unwrap(), WatermarkSize::Full);
        assert_eq!(
            watermark_size(&Args::from([23, 42])).unwrap(),
            WatermarkSize::Exact(Size::new(23, 42))
        );
        assert!(is_invalid(watermark_size(&Args::from("fail"))));
        assert!(is_invalid(watermark_size(&Args::from("not valid"))));
    }

    #[test]
    fn margin_and_position() {
        assert_eq!(margin(&Args::from(10)).unwrap(), Margin { x: 10, y: 10 });
        assert_eq!(margin(&Args::from([-5, 8])).unwrap(), Margin { x: -5, y: 8 });
        assert!(is_invalid(margin(&Args::from("fail"))));
        assert!(is_invalid(position(&Args::Positional(vec![
            Param::from(23),
            Param::from("fail"),
        ]))));
    }

    #[test]
    fn args_deserialize_from_toml_shapes() {
        #[derive(Deserialize)]
        struct Holder {
            a: Args,
            b: Args,
            c: Args,
            d: Args,
        }
        let holder: Holder =
            toml::from_str("a = 250\nb = [1, 2]\nc = { w = 3, h = 4 }\nd = \"#fff\"").unwrap();
        assert_eq!(size(&holder.a).unwrap(), Size::new(250, 250));
        assert_eq!(size(&holder.b).unwrap(), Size::new(1, 2));
        assert_eq!(size(&holder.c).unwrap(), Size::new(3, 4));
        assert_eq!(color(&holder.d).unwrap(), Color::new(255, 255, 255, 0));
    }
}
