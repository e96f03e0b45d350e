//! The theme engine: mode selection, palette derivation and surface output.
//!
//! [`ThemeEngine`] ties the pieces together. On every apply it:
//!
//! 1. reads the system [`Appearance`] to pick the minimum contrast ratio,
//! 2. resolves the mode (explicit request, then stored choice, then system),
//! 3. derives a readable [`Palette`],
//! 4. writes custom properties, `data-theme` and `color-scheme` to the
//!    [`StyleSurface`],
//! 5. persists the mode if it was explicitly requested.
//!
//! ```rust
//! use autotheme::{FixedAppearance, PropertySurface, ThemeEngine, ThemeTokens};
//!
//! let mut engine = ThemeEngine::new(PropertySurface::new())
//!     .with_appearance(FixedAppearance::dark());
//! let theme = engine.apply(ThemeTokens::new().with_primary("#345cff")).unwrap();
//!
//! assert_eq!(theme.mode.as_str(), "dark");
//! assert_eq!(engine.surface().attribute("data-theme"), Some("dark"));
//! ```

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ThemeConfig;
use crate::error::ThemeError;
use crate::mode::{AppearanceSource, ColorMode, ModeSetting, SystemAppearance};
use crate::palette::{derive_palette, Palette, ThemeTokens};
use crate::store::{MemoryStore, ModeStore};
use crate::surface::StyleSurface;
use crate::watch::{poll, Subscription};

/// Root attribute carrying the active mode.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// The outcome of applying a theme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedTheme {
    pub mode: ColorMode,
    pub min_ratio: f64,
    pub palette: Palette,
}

/// Applies themes to a [`StyleSurface`].
pub struct ThemeEngine<S> {
    surface: S,
    config: ThemeConfig,
    store: Box<dyn ModeStore>,
    appearance: Arc<dyn AppearanceSource>,
    /// Overrides from the last apply, with `mode` reset to `Auto`.
    tokens: ThemeTokens,
    mode: ColorMode,
    /// Mode that system changes must not override.
    pinned: Option<ColorMode>,
}

impl<S: StyleSurface> ThemeEngine<S> {
    /// Creates an engine with default configuration, an in-memory mode
    /// store and the OS appearance.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            config: ThemeConfig::default(),
            store: Box::new(MemoryStore::new()),
            appearance: Arc::new(SystemAppearance::new()),
            tokens: ThemeTokens::default(),
            mode: ColorMode::default(),
            pinned: None,
        }
    }

    /// Replaces the configuration. Its tokens become the defaults used by
    /// [`reapply`](Self::reapply) until the next [`apply`](Self::apply); an
    /// explicit `light` or `dark` mode in them is kept the same way an
    /// explicitly applied mode is.
    pub fn with_config(mut self, config: ThemeConfig) -> Self {
        self.pinned = config.tokens.mode.explicit();
        self.tokens = ThemeTokens {
            mode: ModeSetting::Auto,
            ..config.tokens.clone()
        };
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: impl ModeStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_appearance(mut self, source: impl AppearanceSource + 'static) -> Self {
        self.appearance = Arc::new(source);
        self
    }

    /// Applies `tokens` to the surface.
    ///
    /// Nothing is written when a token fails to resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidToken`] if a color override cannot be
    /// parsed.
    pub fn apply(&mut self, tokens: ThemeTokens) -> Result<ResolvedTheme, ThemeError> {
        let appearance = self.appearance.appearance();
        let min_ratio = self.config.min_ratio(&appearance);

        let requested = tokens.mode.explicit();
        let (mode, pinned) = match requested {
            Some(mode) => (mode, Some(mode)),
            None => match self.load_stored() {
                Some(stored) => (stored, Some(stored)),
                None => (appearance.mode, None),
            },
        };

        let palette = derive_palette(mode, &tokens, min_ratio)?;
        debug!(%mode, ?requested, min_ratio, "applying theme");
        self.write_surface(mode, &palette);

        if let Some(mode) = requested {
            if self.config.persist {
                self.save_stored(mode);
            }
        }

        self.mode = mode;
        self.pinned = pinned;
        self.tokens = ThemeTokens {
            mode: ModeSetting::Auto,
            ..tokens
        };

        Ok(ResolvedTheme {
            mode,
            min_ratio,
            palette,
        })
    }

    /// The mode of the last apply.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Switches mode, keeping the remembered token overrides.
    ///
    /// `Auto` forgets any stored choice and follows the system again.
    pub fn set_mode(&mut self, setting: ModeSetting) -> Result<ColorMode, ThemeError> {
        if setting == ModeSetting::Auto {
            self.forget_mode();
        }
        let tokens = self.tokens.clone().with_mode(setting);
        self.apply(tokens).map(|theme| theme.mode)
    }

    /// Drops any stored or pinned mode so the next apply follows the system.
    ///
    /// The surface is left as it is until the next apply.
    pub fn forget_mode(&mut self) {
        self.pinned = None;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored mode");
        }
    }

    /// Enables or disables persisting explicit mode choices.
    pub fn set_persist(&mut self, persist: bool) {
        self.config.persist = persist;
    }

    /// Applies the remembered tokens again, keeping an explicit or stored
    /// mode and otherwise following the system.
    pub fn reapply(&mut self) -> Result<ResolvedTheme, ThemeError> {
        let setting = self.pinned.map_or(ModeSetting::Auto, ModeSetting::from);
        let tokens = self.tokens.clone().with_mode(setting);
        self.apply(tokens)
    }

    /// The mode held by the store, if any.
    pub fn stored_mode(&self) -> Option<ColorMode> {
        self.load_stored()
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn write_surface(&mut self, mode: ColorMode, palette: &Palette) {
        for (name, color) in palette.properties() {
            self.surface.set_property(name, &color.to_hex());
        }
        self.surface.set_attribute(THEME_ATTRIBUTE, mode.as_str());
        self.surface.set_color_scheme(mode);
    }

    fn load_stored(&self) -> Option<ColorMode> {
        match self.store.load() {
            Ok(mode) => mode,
            Err(err) => {
                warn!(error = %err, "failed to read stored mode, ignoring");
                None
            }
        }
    }

    fn save_stored(&mut self, mode: ColorMode) {
        if let Err(err) = self.store.save(mode) {
            warn!(error = %err, %mode, "failed to store mode");
        }
    }
}

impl<S: StyleSurface + Send + 'static> ThemeEngine<S> {
    /// Applies in `Auto` mode and keeps the theme in sync with the system.
    ///
    /// The watcher re-applies on every appearance change. It holds only a
    /// weak reference, so dropping the engine silences it; dropping the
    /// returned [`Subscription`] stops it. The watcher never waits for the
    /// engine lock: while someone else holds it, the change is retried on the
    /// next poll, so stopping the subscription with the lock held is safe.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial apply fails or the watcher thread
    /// cannot be started.
    pub fn auto(engine: &Arc<Mutex<Self>>, interval: Duration) -> Result<Subscription, ThemeError> {
        let (source, mut applied) = {
            let mut guard = lock_engine(engine);
            let tokens = guard.tokens.clone().with_mode(ModeSetting::Auto);
            guard.apply(tokens)?;
            let source = Arc::clone(&guard.appearance);
            let applied = source.appearance();
            (source, applied)
        };

        let weak = Arc::downgrade(engine);
        poll(source, interval, move |appearance| {
            if appearance == applied {
                return;
            }
            let Some(engine) = weak.upgrade() else {
                return;
            };
            let mut guard = match engine.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::WouldBlock) => {
                    trace!("theme engine busy, retrying on next poll");
                    return;
                }
                Err(TryLockError::Poisoned(poisoned)) => {
                    warn!("theme engine lock poisoned, recovering");
                    poisoned.into_inner()
                }
            };
            debug!(from = ?applied, to = ?appearance, "re-applying theme for new appearance");
            if let Err(err) = guard.reapply() {
                warn!(error = %err, "failed to re-apply theme");
            }
            applied = appearance;
        })
    }
}

fn lock_engine<T>(engine: &Mutex<T>) -> MutexGuard<'_, T> {
    engine.lock().unwrap_or_else(|poisoned| {
        warn!("theme engine lock poisoned, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::FixedAppearance;
    use crate::surface::PropertySurface;

    fn engine(appearance: FixedAppearance) -> ThemeEngine<PropertySurface> {
        ThemeEngine::new(PropertySurface::new()).with_appearance(appearance)
    }

    #[test]
    fn test_apply_writes_surface() {
        let mut engine = engine(FixedAppearance::dark());
        let theme = engine.apply(ThemeTokens::new()).unwrap();

        assert_eq!(theme.mode, ColorMode::Dark);
        assert_eq!(theme.min_ratio, 4.5);

        let surface = engine.surface();
        assert_eq!(surface.attribute(THEME_ATTRIBUTE), Some("dark"));
        assert_eq!(surface.color_scheme(), Some(ColorMode::Dark));
        assert_eq!(surface.property("--bg"), Some("#111218"));
        assert_eq!(surface.property("--on-primary"), Some("#000000"));
        assert_eq!(surface.properties().count(), 6);
    }

    #[test]
    fn test_mode_tracks_last_apply() {
        let mut engine = engine(FixedAppearance::light());
        assert_eq!(engine.mode(), ColorMode::Light);
        engine.set_mode(ModeSetting::Dark).unwrap();
        assert_eq!(engine.mode(), ColorMode::Dark);
    }

    #[test]
    fn test_reapply_follows_system_when_not_pinned() {
        let mut engine = engine(FixedAppearance::light());
        engine.apply(ThemeTokens::new()).unwrap();
        assert_eq!(engine.reapply().unwrap().mode, ColorMode::Light);
        assert_eq!(engine.stored_mode(), None);
    }

    #[test]
    fn test_reapply_keeps_explicit_mode_without_persistence() {
        let mut engine = engine(FixedAppearance::light())
            .with_config(ThemeConfig::new().with_persist(false));
        engine.apply(ThemeTokens::new().with_mode(ModeSetting::Dark)).unwrap();

        assert_eq!(engine.stored_mode(), None);
        assert_eq!(engine.reapply().unwrap().mode, ColorMode::Dark);
    }

    #[test]
    fn test_config_tokens_are_defaults() {
        let config = ThemeConfig::new().with_tokens(ThemeTokens::new().with_accent("#ff0000"));
        let mut engine = engine(FixedAppearance::light()).with_config(config);

        let theme = engine.reapply().unwrap();
        assert_eq!(theme.mode, ColorMode::Light);
        assert_eq!(engine.surface().property("--accent"), Some("#ff0000"));
        assert_eq!(engine.config().tokens.accent, Some("#ff0000".into()));
    }

    #[test]
    fn test_configured_mode_is_honored() {
        let config = ThemeConfig::from_yaml("persist: false\ntokens:\n  mode: dark\n").unwrap();
        let mut engine = engine(FixedAppearance::light()).with_config(config);

        assert!(!engine.config().persist);
        assert_eq!(engine.reapply().unwrap().mode, ColorMode::Dark);
        assert_eq!(engine.surface().attribute(THEME_ATTRIBUTE), Some("dark"));
    }

    #[test]
    fn test_forget_mode_unpins() {
        let mut engine = engine(FixedAppearance::light())
            .with_store(MemoryStore::with_mode(ColorMode::Dark));
        assert_eq!(engine.reapply().unwrap().mode, ColorMode::Dark);

        engine.forget_mode();
        assert_eq!(engine.stored_mode(), None);
        // Nothing is re-applied until asked.
        assert_eq!(engine.surface().attribute(THEME_ATTRIBUTE), Some("dark"));
        assert_eq!(engine.reapply().unwrap().mode, ColorMode::Light);
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let shared = Arc::new(Mutex::new(engine(FixedAppearance::dark())));
        let poisoner = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(shared.is_poisoned());
        let mut guard = lock_engine(&shared);
        assert_eq!(guard.reapply().unwrap().mode, ColorMode::Dark);
    }
}
