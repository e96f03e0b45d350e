//! # autotheme-color - Color Contrast Engine
//!
//! `autotheme-color` provides the color math behind `autotheme`: reading
//! color text, converting between RGB and HSL, measuring WCAG contrast, and
//! adjusting colors until text stays readable.
//!
//! Every function is pure and works on small `Copy` values, so they can be
//! called freely from any thread.
//!
//! ## Core Concepts
//!
//! - [`Rgb`]: an sRGB color with 8-bit channels
//! - [`Hsl`]: hue/saturation/lightness view of an [`Rgb`]
//! - [`parse_color`]: reads `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `hsl(h, s%, l%)`
//! - [`contrast`]: WCAG contrast ratio between two colors or color strings
//! - [`pick_on`]: white or black, whichever reads better on a base color
//! - [`ensure_contrast`]: nudges a foreground's lightness until it passes
//!
//! ## Quick Start
//!
//! ```rust
//! use autotheme_color::{contrast, ensure_contrast, parse_color, pick_on, DEFAULT_MIN_RATIO};
//!
//! let bg = parse_color("#ffffff").unwrap();
//! let fg = parse_color("#777").unwrap();
//!
//! // #777 on white is just short of WCAG AA.
//! assert!(contrast(fg, bg).unwrap() < DEFAULT_MIN_RATIO);
//!
//! let readable = ensure_contrast(fg, bg, DEFAULT_MIN_RATIO);
//! assert!(contrast(readable, bg).unwrap() >= DEFAULT_MIN_RATIO);
//!
//! let primary = parse_color("hsl(228, 100%, 60%)").unwrap();
//! println!("text on {} should be {}", primary, pick_on(primary, DEFAULT_MIN_RATIO));
//! ```
//!
//! ## Errors
//!
//! Only parsing can fail, with [`ColorError::UnsupportedFormat`]. Resolution
//! never fails: when a ratio is unreachable, the closest color is returned.

pub mod color;
pub mod contrast;
mod error;
pub mod resolve;

pub use color::{hsl_to_rgb, parse_color, rgb_to_hsl, ColorSpec, Hsl, IntoRgb, Rgb};
pub use contrast::{contrast, contrast_ratio, relative_luminance};
pub use error::ColorError;
pub use resolve::{ensure_contrast, pick_on, DEFAULT_MIN_RATIO, MORE_CONTRAST_RATIO};

/// Formats a color as `#rrggbb`.
///
/// Free-function form of [`Rgb::to_hex`].
pub fn to_hex(rgb: Rgb) -> String {
    rgb.to_hex()
}
