//! WCAG 2.1 relative luminance and contrast ratio.
//!
//! Luminance is computed in linear light: each sRGB channel is expanded with
//! the standard transfer function, then weighted by the Rec. 709 primaries.
//! The contrast ratio compares the lighter and darker luminance with a 0.05
//! flare term, giving values from `1.0` (identical) to `21.0` (black on
//! white).

use crate::color::{IntoRgb, Rgb};
use crate::error::ColorError;

/// Convert an sRGB component (0–255) to linear light (0.0–1.0).
fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Computes the relative luminance of a color.
///
///   L = 0.2126 * `R_lin` + 0.7152 * `G_lin` + 0.0722 * `B_lin`
///
/// Returns a value in `[0.0, 1.0]` where 0 is black and 1 is white.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * srgb_to_linear(rgb.0) + 0.7152 * srgb_to_linear(rgb.1) + 0.0722 * srgb_to_linear(rgb.2)
}

/// Computes the contrast ratio between two colors.
///
/// The result is the same regardless of argument order and is exactly `1.0`
/// when both colors are equal.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Computes the contrast ratio between two colors given as values or text.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] if either argument is text that
/// cannot be parsed.
///
/// # Example
///
/// ```rust
/// use autotheme_color::{contrast, Rgb};
///
/// let ratio = contrast("#000", Rgb::WHITE).unwrap();
/// assert!((ratio - 21.0).abs() < 1e-9);
/// assert!(contrast("#000", "bogus").is_err());
/// ```
pub fn contrast(a: impl IntoRgb, b: impl IntoRgb) -> Result<f64, ColorError> {
    Ok(contrast_ratio(a.into_rgb()?, b.into_rgb()?))
}
