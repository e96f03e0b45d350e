//! Property-based tests for the color engine using proptest.

use autotheme_color::{
    contrast_ratio, ensure_contrast, hsl_to_rgb, parse_color, pick_on, relative_luminance,
    rgb_to_hsl, Rgb,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

fn rgb_strategy() -> impl Strategy<Value = Rgb> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgb(r, g, b))
}

fn ratio_strategy() -> impl Strategy<Value = f64> {
    1.0f64..21.0
}

fn within_one(a: Rgb, b: Rgb) -> bool {
    let close = |x: u8, y: u8| x.abs_diff(y) <= 1;
    close(a.0, b.0) && close(a.1, b.1) && close(a.2, b.2)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Hex, uppercase hex and rgb() notations of one color parse identically.
    #[test]
    fn notations_parse_to_same_color(c in rgb_strategy()) {
        let hex = parse_color(&c.to_hex()).unwrap();
        let upper = parse_color(&c.to_hex().to_uppercase()).unwrap();
        let func = parse_color(&format!("rgb({}, {}, {})", c.0, c.1, c.2)).unwrap();

        prop_assert_eq!(hex, c);
        prop_assert_eq!(upper, c);
        prop_assert_eq!(func, c);
    }

    /// Short hex expands each digit, matching the long form.
    #[test]
    fn short_hex_matches_long_hex(r in 0u8..16, g in 0u8..16, b in 0u8..16) {
        let short = parse_color(&format!("#{:x}{:x}{:x}", r, g, b)).unwrap();
        let long = parse_color(&format!("#{0:x}{0:x}{1:x}{1:x}{2:x}{2:x}", r, g, b)).unwrap();
        prop_assert_eq!(short, long);
        prop_assert_eq!(short, Rgb(r * 17, g * 17, b * 17));
    }

    /// hsl() text of a color parses back within quantization tolerance.
    #[test]
    fn hsl_notation_parses_back(c in rgb_strategy()) {
        let text = rgb_to_hsl(c).to_string();
        let parsed = parse_color(&text).unwrap();
        prop_assert!(within_one(parsed, c), "{} -> {} -> {}", c, text, parsed);
    }

    /// RGB -> HSL -> RGB is lossless up to one step per channel.
    #[test]
    fn hsl_round_trip_within_one(c in rgb_strategy()) {
        let back = hsl_to_rgb(rgb_to_hsl(c));
        prop_assert!(within_one(back, c), "{} came back as {}", c, back);
    }

    /// Normalized hue is always in [0, 1).
    #[test]
    fn hue_is_normalized(c in rgb_strategy()) {
        let hsl = rgb_to_hsl(c);
        prop_assert!((0.0..1.0).contains(&hsl.h), "hue {}", hsl.h);
        prop_assert!((0.0..=1.0).contains(&hsl.s));
        prop_assert!((0.0..=1.0).contains(&hsl.l));
    }

    /// Parsing arbitrary text never panics.
    #[test]
    fn parse_never_panics(s in any::<String>()) {
        let _ = parse_color(&s);
    }

    #[test]
    fn luminance_in_unit_range(c in rgb_strategy()) {
        let lum = relative_luminance(c);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&lum), "luminance {}", lum);
    }

    /// Contrast does not depend on argument order.
    #[test]
    fn contrast_is_symmetric(a in rgb_strategy(), b in rgb_strategy()) {
        prop_assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    /// A color against itself has no contrast.
    #[test]
    fn contrast_identity_is_one(a in rgb_strategy()) {
        prop_assert_eq!(contrast_ratio(a, a), 1.0);
    }

    /// Contrast stays between 1:1 and the black/white extreme.
    #[test]
    fn contrast_in_range(a in rgb_strategy(), b in rgb_strategy()) {
        let ratio = contrast_ratio(a, b);
        prop_assert!(ratio >= 1.0, "ratio {}", ratio);
        prop_assert!(ratio <= 21.0 + 1e-9, "ratio {}", ratio);
    }

    /// pick_on always returns the better of white and black.
    #[test]
    fn pick_on_returns_better_extreme(base in rgb_strategy(), min in ratio_strategy()) {
        let on = pick_on(base, min);
        prop_assert!(on == Rgb::WHITE || on == Rgb::BLACK);

        let other = if on == Rgb::WHITE { Rgb::BLACK } else { Rgb::WHITE };
        prop_assert!(contrast_ratio(on, base) >= contrast_ratio(other, base));
    }

    /// A passing foreground is returned untouched.
    #[test]
    fn ensure_keeps_passing_colors(fg in rgb_strategy(), bg in rgb_strategy(), t in 0.0f64..=1.0) {
        // Any minimum at or below the current ratio already passes.
        let min = contrast_ratio(fg, bg) * t;
        prop_assert_eq!(ensure_contrast(fg, bg, min), fg);
    }

    /// Once a result meets the ratio, applying the search again changes nothing.
    #[test]
    fn ensure_is_idempotent(fg in rgb_strategy(), bg in rgb_strategy(), min in ratio_strategy()) {
        let once = ensure_contrast(fg, bg, min);
        if contrast_ratio(once, bg) >= min {
            prop_assert_eq!(ensure_contrast(once, bg, min), once);
        }
    }

    /// Against white or black, the AA ratio is always reachable.
    #[test]
    fn ensure_reaches_aa_on_extremes(fg in rgb_strategy()) {
        for bg in [Rgb::WHITE, Rgb::BLACK] {
            let adjusted = ensure_contrast(fg, bg, 4.5);
            prop_assert!(
                contrast_ratio(adjusted, bg) >= 4.5,
                "{} on {} only reached {}",
                adjusted,
                bg,
                contrast_ratio(adjusted, bg)
            );
        }
    }
}
