//! Theme tokens and palette derivation.
//!
//! A theme is described by five tokens (`bg`, `fg`, `primary`, `muted`,
//! `accent`). Any token the caller leaves out falls back to the built-in
//! palette for the active mode. Two colors are then derived so that text
//! stays readable:
//!
//! - `foreground`: `fg`, with its lightness adjusted until it meets the
//!   minimum ratio against `bg`
//! - `on_primary`: white or black, whichever reads better on `primary`
//!
//! The remaining tokens pass through unchanged.

use autotheme_color::{ensure_contrast, pick_on, ColorSpec, IntoRgb, Rgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ThemeError;
use crate::mode::{ColorMode, ModeSetting};

/// Caller-supplied theme overrides.
///
/// ```yaml
/// mode: dark
/// bg: "#0b0c10"
/// primary: hsl(228, 100%, 70%)
/// accent: [255, 184, 107]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeTokens {
    /// Requested mode; `auto` when omitted.
    pub mode: ModeSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<ColorSpec>,
}

impl ThemeTokens {
    /// Creates an empty set of overrides in `auto` mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ModeSetting) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_bg(mut self, color: impl Into<ColorSpec>) -> Self {
        self.bg = Some(color.into());
        self
    }

    pub fn with_fg(mut self, color: impl Into<ColorSpec>) -> Self {
        self.fg = Some(color.into());
        self
    }

    pub fn with_primary(mut self, color: impl Into<ColorSpec>) -> Self {
        self.primary = Some(color.into());
        self
    }

    pub fn with_muted(mut self, color: impl Into<ColorSpec>) -> Self {
        self.muted = Some(color.into());
        self
    }

    pub fn with_accent(mut self, color: impl Into<ColorSpec>) -> Self {
        self.accent = Some(color.into());
        self
    }
}

/// The built-in token values for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePalette {
    pub bg: Rgb,
    pub fg: Rgb,
    pub primary: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
}

const DARK_BASE: BasePalette = BasePalette {
    bg: Rgb(0x11, 0x12, 0x18),
    fg: Rgb(0xea, 0xea, 0xf2),
    primary: Rgb(0x7a, 0xa2, 0xff),
    muted: Rgb(0x2a, 0x2d, 0x3a),
    accent: Rgb(0xff, 0xb8, 0x6b),
};

const LIGHT_BASE: BasePalette = BasePalette {
    bg: Rgb(0xff, 0xff, 0xff),
    fg: Rgb(0x0e, 0x0f, 0x13),
    primary: Rgb(0x34, 0x5c, 0xff),
    muted: Rgb(0xf1, 0xf3, 0xf7),
    accent: Rgb(0xb9, 0x4c, 0xff),
};

impl BasePalette {
    /// Returns the built-in palette for `mode`.
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => LIGHT_BASE,
            ColorMode::Dark => DARK_BASE,
        }
    }
}

/// Shorthand for [`BasePalette::for_mode`].
pub fn default_tokens(mode: ColorMode) -> BasePalette {
    BasePalette::for_mode(mode)
}

/// The final colors of an applied theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub primary: Rgb,
    pub on_primary: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
}

impl Palette {
    /// Returns the palette as CSS custom properties, in a fixed order.
    pub fn properties(&self) -> [(&'static str, Rgb); 6] {
        [
            ("--bg", self.background),
            ("--fg", self.foreground),
            ("--primary", self.primary),
            ("--on-primary", self.on_primary),
            ("--muted", self.muted),
            ("--accent", self.accent),
        ]
    }
}

/// Resolves `tokens` for `mode` into a readable palette.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidToken`] naming the first token whose color
/// text cannot be parsed.
pub fn derive_palette(
    mode: ColorMode,
    tokens: &ThemeTokens,
    min_ratio: f64,
) -> Result<Palette, ThemeError> {
    let base = BasePalette::for_mode(mode);

    let bg = resolve_token("bg", tokens.bg.as_ref(), base.bg)?;
    let fg = resolve_token("fg", tokens.fg.as_ref(), base.fg)?;
    let primary = resolve_token("primary", tokens.primary.as_ref(), base.primary)?;
    let muted = resolve_token("muted", tokens.muted.as_ref(), base.muted)?;
    let accent = resolve_token("accent", tokens.accent.as_ref(), base.accent)?;

    let foreground = ensure_contrast(fg, bg, min_ratio);
    let on_primary = pick_on(primary, min_ratio);
    if foreground != fg {
        debug!(from = %fg, to = %foreground, bg = %bg, min_ratio, "adjusted foreground");
    }

    Ok(Palette {
        background: bg,
        foreground,
        primary,
        on_primary,
        muted,
        accent,
    })
}

fn resolve_token(
    token: &'static str,
    spec: Option<&ColorSpec>,
    fallback: Rgb,
) -> Result<Rgb, ThemeError> {
    match spec {
        Some(spec) => spec
            .into_rgb()
            .map_err(|source| ThemeError::InvalidToken { token, source }),
        None => Ok(fallback),
    }
}
