//! Readable foreground selection.
//!
//! Two strategies, both total:
//!
//! - [`pick_on`] chooses pure white or pure black for text drawn on top of a
//!   filled color (buttons, badges, accents).
//! - [`ensure_contrast`] keeps a designed foreground color but walks its HSL
//!   lightness toward black or white until it reads against the background.
//!
//! Neither fails when the requested ratio is out of reach. Some bases sit
//! too close to the middle of the luminance range for white or black to
//! reach 7:1, and some hue/saturation pairs cannot reach high ratios at any
//! lightness; the closest result found is returned instead.

use tracing::{debug, trace};

use crate::color::{hsl_to_rgb, rgb_to_hsl, Hsl, Rgb};
use crate::contrast::{contrast_ratio, relative_luminance};

/// WCAG AA minimum for normal text.
pub const DEFAULT_MIN_RATIO: f64 = 4.5;

/// WCAG AAA minimum, used when the user asks for more contrast.
pub const MORE_CONTRAST_RATIO: f64 = 7.0;

const MAX_STEPS: usize = 40;
const STEP_FRACTION: f64 = 0.25;

/// Lightness the search converges to on light backgrounds.
const DARK_TARGET: f64 = 0.05;
/// Lightness the search converges to on dark backgrounds.
const LIGHT_TARGET: f64 = 0.95;

/// Picks white or black as the "on" color for content drawn over `base`.
///
/// White wins when it meets `min_ratio` and contrasts at least as much as
/// black; black wins under the mirrored condition. When neither meets the
/// minimum, the higher-contrast of the two is returned (black on a tie).
///
/// # Example
///
/// ```rust
/// use autotheme_color::{pick_on, Rgb, DEFAULT_MIN_RATIO};
///
/// assert_eq!(pick_on(Rgb::WHITE, DEFAULT_MIN_RATIO), Rgb::BLACK);
/// assert_eq!(pick_on(Rgb(52, 92, 255), DEFAULT_MIN_RATIO), Rgb::WHITE);
/// ```
pub fn pick_on(base: Rgb, min_ratio: f64) -> Rgb {
    let white = contrast_ratio(Rgb::WHITE, base);
    let black = contrast_ratio(Rgb::BLACK, base);

    if white >= min_ratio && white >= black {
        Rgb::WHITE
    } else if black >= min_ratio && black >= white {
        Rgb::BLACK
    } else {
        debug!(
            base = %base,
            min_ratio,
            white,
            black,
            "neither white nor black reaches the minimum ratio"
        );
        if white > black {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }
}

/// Adjusts `fg` until it meets `min_ratio` against `bg`.
///
/// A foreground that already passes is returned unchanged. Otherwise the
/// lightness moves a quarter of the remaining distance toward a target per
/// step (0.05 on light backgrounds, 0.95 on dark ones), for at most 40
/// steps, stopping at the first passing color. Hue and saturation are kept.
/// If no step passes, the last candidate is returned.
///
/// # Example
///
/// ```rust
/// use autotheme_color::{contrast_ratio, ensure_contrast, Rgb};
///
/// let gray = Rgb(0x77, 0x77, 0x77);
/// let adjusted = ensure_contrast(gray, Rgb::WHITE, 4.5);
/// assert!(contrast_ratio(adjusted, Rgb::WHITE) >= 4.5);
/// ```
pub fn ensure_contrast(fg: Rgb, bg: Rgb, min_ratio: f64) -> Rgb {
    if contrast_ratio(fg, bg) >= min_ratio {
        return fg;
    }

    let Hsl { h, s, mut l } = rgb_to_hsl(fg);
    let target = if relative_luminance(bg) > 0.5 {
        DARK_TARGET
    } else {
        LIGHT_TARGET
    };

    let mut candidate = fg;
    for step in 0..MAX_STEPS {
        l += (target - l) * STEP_FRACTION;
        candidate = hsl_to_rgb(Hsl::new(h, s, l));
        let ratio = contrast_ratio(candidate, bg);
        trace!(step, lightness = l, ratio, "contrast search");
        if ratio >= min_ratio {
            return candidate;
        }
    }

    debug!(
        fg = %fg,
        bg = %bg,
        min_ratio,
        result = %candidate,
        "minimum ratio unreachable, returning closest lightness"
    );
    candidate
}
