//! Error types for theme application.

use std::io;
use std::path::PathBuf;

use autotheme_color::ColorError;

/// Errors that can occur while configuring or applying a theme.
///
/// Mode persistence failures are not represented here: the engine logs them
/// and carries on, so a read-only state directory never blocks theming.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A palette token could not be read as a color.
    #[error("invalid color for token '{token}': {source}")]
    InvalidToken {
        /// Token name (`bg`, `fg`, `primary`, `muted` or `accent`).
        token: &'static str,
        #[source]
        source: ColorError,
    },

    /// A mode name other than `light`, `dark` or `auto`.
    #[error("unknown mode '{0}' (expected light, dark or auto)")]
    UnknownMode(String),

    /// The theme configuration could not be parsed.
    #[error("failed to parse theme config: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The appearance watcher thread could not be started.
    #[error("failed to start appearance watcher: {0}")]
    Watch(#[source] io::Error),
}
