//! Persistence of the user's explicit mode choice.
//!
//! Only `light` or `dark` is ever stored; "no stored choice" means follow
//! the system. Reading is forgiving: a missing or unreadable value is
//! treated as no choice rather than an error, so a corrupted state file
//! cannot keep a theme from applying.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::mode::ColorMode;

/// Errors raised by a [`ModeStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read mode from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write mode to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Abstraction over where the explicit mode choice lives.
pub trait ModeStore: Send {
    /// Returns the stored mode, if any.
    fn load(&self) -> Result<Option<ColorMode>, StoreError>;

    /// Stores `mode`, replacing any previous choice.
    fn save(&mut self, mode: ColorMode) -> Result<(), StoreError>;

    /// Removes the stored choice.
    fn clear(&mut self) -> Result<(), StoreError>;
}

// === In-memory implementation ===

/// Keeps the mode for the lifetime of the value. Useful for tests and for
/// embedders that persist state elsewhere.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStore {
    mode: Option<ColorMode>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `mode`.
    pub fn with_mode(mode: ColorMode) -> Self {
        Self { mode: Some(mode) }
    }
}

impl ModeStore for MemoryStore {
    fn load(&self) -> Result<Option<ColorMode>, StoreError> {
        Ok(self.mode)
    }

    fn save(&mut self, mode: ColorMode) -> Result<(), StoreError> {
        self.mode = Some(mode);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.mode = None;
        Ok(())
    }
}

// === File implementation ===

/// Stores the mode as a single word in a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModeStore for FileStore {
    fn load(&self) -> Result<Option<ColorMode>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match content.trim().parse::<ColorMode>() {
            Ok(mode) => Ok(Some(mode)),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "ignoring unreadable stored mode");
                Ok(None)
            }
        }
    }

    fn save(&mut self, mode: ColorMode) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, format!("{mode}\n")).map_err(write_err)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
