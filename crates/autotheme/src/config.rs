//! Engine configuration.
//!
//! Configuration is plain data passed to the engine when it is built; there
//! is no process-wide state. It can be written in YAML:
//!
//! ```yaml
//! # Remember explicit light/dark choices between runs.
//! persist: true
//!
//! # Force a contrast level instead of following the system.
//! contrast: more
//!
//! tokens:
//!   mode: auto
//!   primary: "#345cff"
//!   accent: hsl(280, 100%, 65%)
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::mode::{Appearance, ContrastPreference};
use crate::palette::ThemeTokens;

/// Settings that shape how the engine resolves and applies themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Whether explicit mode choices are written to the mode store.
    pub persist: bool,
    /// Contrast level; `None` follows the system preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<ContrastPreference>,
    /// Theme tokens applied by default. An explicit `light` or `dark` mode
    /// here is kept by re-applications until another mode is applied.
    pub tokens: ThemeTokens,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            persist: true,
            contrast: None,
            tokens: ThemeTokens::default(),
        }
    }
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from YAML. An empty document yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Config`] if the YAML is malformed or contains
    /// unknown keys or unreadable values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use autotheme::{ContrastPreference, ThemeConfig};
    ///
    /// let config = ThemeConfig::from_yaml("persist: false\ncontrast: more\n").unwrap();
    /// assert!(!config.persist);
    /// assert_eq!(config.contrast, Some(ContrastPreference::More));
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| ThemeError::Config(e.to_string()))?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(|e| ThemeError::Config(e.to_string()))
    }

    /// Loads a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Io`] if the file cannot be read, or
    /// [`ThemeError::Config`] if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_contrast(mut self, contrast: ContrastPreference) -> Self {
        self.contrast = Some(contrast);
        self
    }

    pub fn with_tokens(mut self, tokens: ThemeTokens) -> Self {
        self.tokens = tokens;
        self
    }

    /// The minimum contrast ratio for `appearance`, honoring a configured
    /// override.
    pub fn min_ratio(&self, appearance: &Appearance) -> f64 {
        self.contrast
            .unwrap_or_else(|| appearance.contrast())
            .min_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{ColorMode, ModeSetting};
    use autotheme_color::ColorSpec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ThemeConfig::default();
        assert!(config.persist);
        assert_eq!(config.contrast, None);
        assert_eq!(config.tokens, ThemeTokens::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ThemeConfig::from_yaml("").unwrap(), ThemeConfig::default());
        assert_eq!(
            ThemeConfig::from_yaml("# nothing here\n").unwrap(),
            ThemeConfig::default()
        );
    }

    #[test]
    fn test_full_yaml() {
        let config = ThemeConfig::from_yaml(
            r##"
persist: false
contrast: standard
tokens:
  mode: dark
  primary: "#345cff"
  accent: hsl(280, 100%, 65%)
"##,
        )
        .unwrap();

        assert!(!config.persist);
        assert_eq!(config.contrast, Some(ContrastPreference::Standard));
        assert_eq!(config.tokens.mode, ModeSetting::Dark);
        assert_eq!(config.tokens.primary, Some(ColorSpec::from("#345cff")));
        assert_eq!(
            config.tokens.accent,
            Some(ColorSpec::from("hsl(280, 100%, 65%)"))
        );
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = ThemeConfig::from_yaml("persistence: true\n").unwrap_err();
        assert!(matches!(err, ThemeError::Config(_)));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = ThemeConfig::from_yaml("tokens: [unclosed\n").unwrap_err();
        assert!(matches!(err, ThemeError::Config(_)));
    }

    #[test]
    fn test_min_ratio_follows_appearance() {
        let config = ThemeConfig::default();
        assert_eq!(
            config.min_ratio(&Appearance::new(ColorMode::Light, false)),
            4.5
        );
        assert_eq!(
            config.min_ratio(&Appearance::new(ColorMode::Light, true)),
            7.0
        );
    }

    #[test]
    fn test_min_ratio_override() {
        let config = ThemeConfig::new().with_contrast(ContrastPreference::Standard);
        assert_eq!(config.min_ratio(&Appearance::new(ColorMode::Dark, true)), 4.5);

        let config = ThemeConfig::new().with_contrast(ContrastPreference::More);
        assert_eq!(config.min_ratio(&Appearance::new(ColorMode::Dark, false)), 7.0);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "contrast: more").unwrap();
        let config = ThemeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.contrast, Some(ContrastPreference::More));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ThemeConfig::from_file("/nonexistent/autotheme.yaml").unwrap_err();
        assert!(matches!(err, ThemeError::Io { .. }));
    }
}
