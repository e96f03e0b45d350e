//! Error type for color parsing.

/// Errors produced while reading color text.
///
/// Parsing is the only fallible operation in this crate: conversions,
/// luminance and contrast resolution are total over [`Rgb`](crate::Rgb)
/// values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The text matched none of the accepted notations
    /// (`#rgb`, `#rrggbb`, `rgb(r, g, b)`, `hsl(h, s%, l%)`).
    #[error("unsupported color format: {0:?}")]
    UnsupportedFormat(String),
}

impl ColorError {
    /// Creates an [`UnsupportedFormat`](ColorError::UnsupportedFormat) error
    /// for the given input.
    pub fn unsupported(input: impl Into<String>) -> Self {
        Self::UnsupportedFormat(input.into())
    }
}
