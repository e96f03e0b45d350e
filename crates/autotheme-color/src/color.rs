//! Color values and the textual notations used to write them.
//!
//! Supports three notations:
//!
//! - Hex: `#ff6b35` or `#fff` (3 or 6 digits, any case)
//! - RGB function: `rgb(255, 107, 53)` (fractional values are truncated)
//! - HSL function: `hsl(18, 100%, 60%)` (hue in degrees)
//!
//! Function names are matched case-insensitively and whitespace around the
//! commas is ignored. Anything else is rejected with
//! [`ColorError::UnsupportedFormat`].
//!
//! # Hue units
//!
//! [`Hsl::h`] is measured in turns. The `hsl()` parser converts degrees to
//! turns (`h / 360`) and leaves range handling to [`hsl_to_rgb`], which wraps
//! the hue cyclically. `hsl(480, 100%, 50%)` is therefore the same color as
//! `hsl(120, 100%, 50%)`.
//!
//! # Example
//!
//! ```rust
//! use autotheme_color::{parse_color, rgb_to_hsl, hsl_to_rgb, Rgb};
//!
//! let orange = parse_color("#ff6b35").unwrap();
//! assert_eq!(orange, Rgb(255, 107, 53));
//! assert_eq!(parse_color("rgb(255, 107, 53)").unwrap(), orange);
//! assert_eq!(orange.to_hex(), "#ff6b35");
//!
//! let hsl = rgb_to_hsl(orange);
//! assert_eq!(hsl_to_rgb(hsl), orange);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ColorError;

// ─── RGB ────────────────────────────────────────────────────────────────────

/// An sRGB color with three 8-bit channels (red, green, blue).
///
/// Serializes as its `#rrggbb` hex string. Deserializes from any
/// [`ColorSpec`] form: a color string, a `[r, g, b]` sequence or an
/// `{ r, g, b }` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure white, `#ffffff`.
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Pure black, `#000000`.
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Builds a color from unbounded channel values.
    ///
    /// Each value is truncated toward zero and clamped into `0..=255`.
    /// Non-finite values become `0`.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Rgb(truncate_channel(r), truncate_channel(g), truncate_channel(b))
    }

    /// Formats the color as `#rrggbb` with lowercase, zero-padded digits.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Returns the nearest xterm 256-color palette index.
    ///
    /// Grays map onto the 24-step grayscale ramp, everything else onto the
    /// 6×6×6 color cube.
    pub fn to_ansi256(self) -> u8 {
        let Rgb(r, g, b) = self;
        if r == g && g == b {
            return match r {
                0..=7 => 16,
                249..=255 => 231,
                _ => 232 + ((u16::from(r) - 8) * 24 / 247) as u8,
            };
        }
        let level = |c: u8| (u16::from(c) * 5 / 255) as u8;
        16 + 36 * level(r) + 6 * level(g) + level(b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ColorSpec::deserialize(deserializer)?
            .into_rgb()
            .map_err(serde::de::Error::custom)
    }
}

fn truncate_channel(v: f64) -> u8 {
    if v.is_finite() {
        v.trunc().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

fn unit_to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

// ─── HSL ────────────────────────────────────────────────────────────────────

/// Hue / saturation / lightness representation of an [`Rgb`] color.
///
/// All components are fractions: `h` in turns (`[0, 1)` once normalized),
/// `s` and `l` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    /// Hue in turns. Values outside `[0, 1)` wrap around.
    pub h: f64,
    /// Saturation, `0.0` (gray) to `1.0` (fully saturated).
    pub s: f64,
    /// Lightness, `0.0` (black) to `1.0` (white).
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.h * 360.0,
            self.s * 100.0,
            self.l * 100.0
        )
    }
}

/// Converts an RGB color to HSL.
///
/// Achromatic colors (all channels equal) get `h = 0` and `s = 0`.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.0) / 255.0;
    let g = f64::from(rgb.1) / 255.0;
    let b = f64::from(rgb.2) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h / 6.0, s, l)
}

/// Converts an HSL color to RGB.
///
/// The hue is wrapped into `[0, 1)` first (so `-0.25` and `1.75` both mean
/// `0.75`); saturation and lightness are clamped into `[0, 1]`. Each channel
/// is rounded to the nearest integer.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = normalize_hue(hsl.h);
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    // One 60° sector per arm.
    let (r, g, b) = match (h * 6.0) as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb(
        unit_to_channel(r + m),
        unit_to_channel(g + m),
        unit_to_channel(b + m),
    )
}

fn normalize_hue(h: f64) -> f64 {
    if h.is_finite() {
        h.rem_euclid(1.0)
    } else {
        0.0
    }
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parses a color from one of the supported notations.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] when the text is not valid
/// hex, `rgb()` or `hsl()` notation.
///
/// # Example
///
/// ```rust
/// use autotheme_color::{parse_color, ColorError, Rgb};
///
/// assert_eq!(parse_color("#fff").unwrap(), Rgb::WHITE);
/// assert_eq!(parse_color("hsl(0, 100%, 50%)").unwrap(), Rgb(255, 0, 0));
/// assert!(matches!(
///     parse_color("not-a-color"),
///     Err(ColorError::UnsupportedFormat(_))
/// ));
/// ```
pub fn parse_color(text: &str) -> Result<Rgb, ColorError> {
    let s = text.trim();

    let parsed = if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)
    } else if let Some(args) = function_args(s, "rgb") {
        parse_rgb_args(args)
    } else if let Some(args) = function_args(s, "hsl") {
        parse_hsl_args(args)
    } else {
        None
    };

    parsed.ok_or_else(|| ColorError::unsupported(text))
}

/// Parses the digits of a hex color (without the `#` prefix).
fn parse_hex(hex: &str) -> Option<Rgb> {
    // from_str_radix accepts a leading '+', so validate the digits up front.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        // #rgb -> #rrggbb
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(Rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Rgb(pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}

/// Returns the text between the parentheses of `name(...)`, matching the
/// function name case-insensitively.
fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let head = s.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    s[name.len()..].strip_prefix('(')?.strip_suffix(')')
}

fn parse_rgb_args(args: &str) -> Option<Rgb> {
    let [r, g, b] = three_components(args)?;
    Some(Rgb::from_channels(number(r)?, number(g)?, number(b)?))
}

fn parse_hsl_args(args: &str) -> Option<Rgb> {
    let [h, s, l] = three_components(args)?;
    let hsl = Hsl::new(number(h)? / 360.0, percentage(s)?, percentage(l)?);
    Some(hsl_to_rgb(hsl))
}

fn three_components(args: &str) -> Option<[&str; 3]> {
    let mut parts = args.split(',').map(str::trim);
    let components = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(components)
}

fn number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a percentage, with or without the `%` suffix, as a fraction.
fn percentage(s: &str) -> Option<f64> {
    number(s.strip_suffix('%').unwrap_or(s).trim_end()).map(|v| v / 100.0)
}

// ─── Color arguments ────────────────────────────────────────────────────────

/// A color as written in configuration: text in any supported notation, or
/// a structured channel triple.
///
/// ```yaml
/// bg: "#111218"
/// fg: [234, 234, 242]
/// accent: { r: 255, g: 184, b: 107 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Color text (`#hex`, `rgb()`, `hsl()`), parsed on resolution.
    Text(String),
    /// `[r, g, b]` channel sequence.
    Triple([f64; 3]),
    /// `{ r, g, b }` channel map.
    Channels { r: f64, g: f64, b: f64 },
}

impl From<Rgb> for ColorSpec {
    fn from(rgb: Rgb) -> Self {
        ColorSpec::Text(rgb.to_hex())
    }
}

impl From<&str> for ColorSpec {
    fn from(text: &str) -> Self {
        ColorSpec::Text(text.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(text: String) -> Self {
        ColorSpec::Text(text)
    }
}

/// Values accepted wherever either a color or color text is allowed.
///
/// Text is parsed with [`parse_color`]; values that are already colors
/// convert infallibly.
pub trait IntoRgb {
    /// Resolves `self` to an [`Rgb`] color.
    fn into_rgb(self) -> Result<Rgb, ColorError>;
}

impl IntoRgb for Rgb {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        Ok(self)
    }
}

impl IntoRgb for &Rgb {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        Ok(*self)
    }
}

impl IntoRgb for Hsl {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        Ok(hsl_to_rgb(self))
    }
}

impl IntoRgb for &str {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        parse_color(self)
    }
}

impl IntoRgb for String {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        parse_color(&self)
    }
}

impl IntoRgb for &String {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        parse_color(self)
    }
}

impl IntoRgb for &ColorSpec {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        match self {
            ColorSpec::Text(text) => parse_color(text),
            ColorSpec::Triple([r, g, b]) => Ok(Rgb::from_channels(*r, *g, *b)),
            ColorSpec::Channels { r, g, b } => Ok(Rgb::from_channels(*r, *g, *b)),
        }
    }
}

impl IntoRgb for ColorSpec {
    fn into_rgb(self) -> Result<Rgb, ColorError> {
        (&self).into_rgb()
    }
}
