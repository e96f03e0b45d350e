//! # autotheme - Adaptive Themes with Readable Text
//!
//! `autotheme` picks a light or dark palette from the user's choice and the
//! system appearance, makes sure text on it meets a WCAG contrast ratio, and
//! writes the result to a style surface.
//!
//! The color math lives in [`autotheme_color`], re-exported as [`color`].
//!
//! ## Core Concepts
//!
//! - [`ThemeEngine`]: applies themes, switches modes, follows the system
//! - [`ThemeTokens`]: per-call color overrides (`bg`, `fg`, `primary`, ...)
//! - [`ThemeConfig`]: persistence and contrast settings, loadable from YAML
//! - [`StyleSurface`]: where output goes; [`PropertySurface`] keeps it in
//!   memory and renders CSS
//! - [`ModeStore`]: remembers an explicit light/dark choice
//! - [`AppearanceSource`]: system scheme and contrast preference
//!
//! ## Quick Start
//!
//! ```rust
//! use autotheme::{
//!     FixedAppearance, ModeSetting, PropertySurface, ThemeEngine, ThemeTokens,
//! };
//!
//! let mut engine = ThemeEngine::new(PropertySurface::new())
//!     .with_appearance(FixedAppearance::light());
//!
//! // Too light for white: the foreground is darkened until it passes 4.5:1.
//! let theme = engine.apply(ThemeTokens::new().with_fg("#999999")).unwrap();
//! assert!(autotheme::contrast(theme.palette.foreground, theme.palette.background).unwrap() >= 4.5);
//!
//! engine.set_mode(ModeSetting::Dark).unwrap();
//! print!("{}", engine.surface().to_css());
//! ```
//!
//! ## Following the System
//!
//! [`ThemeEngine::auto`] applies in `auto` mode and starts a watcher that
//! re-applies whenever the system appearance changes. The watcher runs until
//! the returned [`Subscription`] is stopped or dropped.

pub mod config;
pub mod engine;
mod error;
pub mod mode;
pub mod palette;
pub mod store;
pub mod surface;
pub mod watch;

pub use autotheme_color as color;
pub use autotheme_color::{contrast, ColorError, ColorSpec, Rgb};

pub use config::ThemeConfig;
pub use engine::{ResolvedTheme, ThemeEngine, THEME_ATTRIBUTE};
pub use error::ThemeError;
pub use mode::{
    Appearance, AppearanceSource, ColorMode, ContrastPreference, FixedAppearance, ModeSetting,
    SystemAppearance,
};
pub use palette::{default_tokens, derive_palette, BasePalette, Palette, ThemeTokens};
pub use store::{FileStore, MemoryStore, ModeStore, StoreError};
pub use surface::{PropertySurface, StyleSurface};
pub use watch::{watch, Subscription};
