//! Light/dark mode selection and system appearance.
//!
//! The system side is read through the [`AppearanceSource`] trait so that
//! tests and embedders can supply their own preferences:
//!
//! - [`SystemAppearance`] asks the OS for its color scheme (via `dark-light`)
//! - [`FixedAppearance`] always reports the same snapshot
//!
//! ```rust
//! use autotheme::{Appearance, AppearanceSource, ColorMode, FixedAppearance};
//!
//! let source = FixedAppearance::new(Appearance::new(ColorMode::Dark, true));
//! assert_eq!(source.appearance().mode, ColorMode::Dark);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use autotheme_color::{DEFAULT_MIN_RATIO, MORE_CONTRAST_RATIO};
use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ThemeError;

/// A concrete color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode (light background, dark text).
    #[default]
    Light,
    /// Dark mode (dark background, light text).
    Dark,
}

impl ColorMode {
    /// Returns `"light"` or `"dark"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ColorMode::Light),
            "dark" => Ok(ColorMode::Dark),
            other => Err(ThemeError::UnknownMode(other.to_string())),
        }
    }
}

/// The mode a caller asks for.
///
/// `Auto` resolves to the stored preference if there is one, otherwise to
/// the system scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ModeSetting {
    /// Returns the requested mode, or `None` for `Auto`.
    pub fn explicit(self) -> Option<ColorMode> {
        match self {
            ModeSetting::Light => Some(ColorMode::Light),
            ModeSetting::Dark => Some(ColorMode::Dark),
            ModeSetting::Auto => None,
        }
    }
}

impl From<ColorMode> for ModeSetting {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => ModeSetting::Light,
            ColorMode::Dark => ModeSetting::Dark,
        }
    }
}

impl FromStr for ModeSetting {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ModeSetting::Auto),
            other => other.parse::<ColorMode>().map(ModeSetting::from),
        }
    }
}

/// How much contrast text needs against its background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastPreference {
    /// WCAG AA, 4.5:1.
    #[default]
    Standard,
    /// WCAG AAA, 7:1.
    More,
}

impl ContrastPreference {
    pub fn min_ratio(self) -> f64 {
        match self {
            ContrastPreference::Standard => DEFAULT_MIN_RATIO,
            ContrastPreference::More => MORE_CONTRAST_RATIO,
        }
    }
}

/// A snapshot of the user's system display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Appearance {
    /// Preferred color scheme.
    pub mode: ColorMode,
    /// Whether the user asked for increased contrast.
    pub more_contrast: bool,
}

impl Appearance {
    pub fn new(mode: ColorMode, more_contrast: bool) -> Self {
        Self {
            mode,
            more_contrast,
        }
    }

    /// The contrast preference implied by this snapshot.
    pub fn contrast(self) -> ContrastPreference {
        if self.more_contrast {
            ContrastPreference::More
        } else {
            ContrastPreference::Standard
        }
    }
}

/// Abstraction over reading system display preferences.
///
/// Implementations are polled by the appearance watcher from a background
/// thread, hence the `Send + Sync` bound.
pub trait AppearanceSource: Send + Sync {
    /// Returns the current preferences.
    fn appearance(&self) -> Appearance;
}

impl<T: AppearanceSource + ?Sized> AppearanceSource for Arc<T> {
    fn appearance(&self) -> Appearance {
        (**self).appearance()
    }
}

// === Real implementation ===

/// Reads the OS color scheme.
///
/// The OS contrast preference is not available through `dark-light`, so it
/// is supplied with [`with_more_contrast`](SystemAppearance::with_more_contrast).
/// When the scheme cannot be detected, light mode is assumed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAppearance {
    more_contrast: bool,
}

impl SystemAppearance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether increased contrast is requested.
    pub fn with_more_contrast(mut self, more_contrast: bool) -> Self {
        self.more_contrast = more_contrast;
        self
    }
}

impl AppearanceSource for SystemAppearance {
    fn appearance(&self) -> Appearance {
        Appearance::new(os_color_mode(), self.more_contrast)
    }
}

fn os_color_mode() -> ColorMode {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => ColorMode::Dark,
        Ok(OsThemeMode::Light) => ColorMode::Light,
        Ok(_) => {
            debug!("OS reported no color scheme preference, assuming light");
            ColorMode::Light
        }
        Err(err) => {
            debug!(error = ?err, "OS color scheme detection failed, assuming light");
            ColorMode::Light
        }
    }
}

// === Fixed implementation ===

/// An appearance source that always reports the same preferences.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedAppearance(pub Appearance);

impl FixedAppearance {
    pub fn new(appearance: Appearance) -> Self {
        Self(appearance)
    }

    /// Fixed dark scheme at standard contrast.
    pub fn dark() -> Self {
        Self(Appearance::new(ColorMode::Dark, false))
    }

    /// Fixed light scheme at standard contrast.
    pub fn light() -> Self {
        Self(Appearance::new(ColorMode::Light, false))
    }
}

impl AppearanceSource for FixedAppearance {
    fn appearance(&self) -> Appearance {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_round_trips_through_str() {
        for mode in [ColorMode::Light, ColorMode::Dark] {
            assert_eq!(mode.as_str().parse::<ColorMode>().unwrap(), mode);
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn test_color_mode_rejects_unknown() {
        let err = "sepia".parse::<ColorMode>().unwrap_err();
        assert!(matches!(err, ThemeError::UnknownMode(ref m) if m == "sepia"));
        // "auto" is a setting, not a concrete mode.
        assert!("auto".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_mode_setting_parse() {
        assert_eq!("auto".parse::<ModeSetting>().unwrap(), ModeSetting::Auto);
        assert_eq!("dark".parse::<ModeSetting>().unwrap(), ModeSetting::Dark);
        assert!("Dark".parse::<ModeSetting>().is_err());
    }

    #[test]
    fn test_mode_setting_explicit() {
        assert_eq!(ModeSetting::Light.explicit(), Some(ColorMode::Light));
        assert_eq!(ModeSetting::Dark.explicit(), Some(ColorMode::Dark));
        assert_eq!(ModeSetting::Auto.explicit(), None);
        assert_eq!(ModeSetting::default(), ModeSetting::Auto);
    }

    #[test]
    fn test_contrast_preference_ratios() {
        assert_eq!(ContrastPreference::Standard.min_ratio(), 4.5);
        assert_eq!(ContrastPreference::More.min_ratio(), 7.0);
        assert_eq!(
            Appearance::new(ColorMode::Light, true).contrast(),
            ContrastPreference::More
        );
    }

    #[test]
    fn test_modes_deserialize_lowercase() {
        let setting: ModeSetting = serde_yaml::from_str("dark").unwrap();
        assert_eq!(setting, ModeSetting::Dark);
        let pref: ContrastPreference = serde_yaml::from_str("more").unwrap();
        assert_eq!(pref, ContrastPreference::More);
        assert!(serde_yaml::from_str::<ModeSetting>("dim").is_err());
    }

    #[test]
    fn test_fixed_appearance_through_arc() {
        let source: Arc<dyn AppearanceSource> = Arc::new(FixedAppearance::dark());
        assert_eq!(source.appearance(), Appearance::new(ColorMode::Dark, false));
    }
}
