//! Style surfaces: where an applied theme is written.
//!
//! The engine never touches a document directly. It writes through the
//! [`StyleSurface`] trait, which mirrors what a page root offers: custom
//! properties, a theme attribute and the `color-scheme` hint.
//!
//! [`PropertySurface`] is an in-memory implementation that records what was
//! written and can render it as a CSS rule.

use std::fmt::Write as _;

use crate::mode::ColorMode;

/// A target that receives theme output.
pub trait StyleSurface {
    /// Sets a custom property such as `--bg` to a CSS value.
    fn set_property(&mut self, name: &str, value: &str);

    /// Sets an attribute on the root element, such as `data-theme`.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Sets the `color-scheme` hint so native controls follow the mode.
    fn set_color_scheme(&mut self, mode: ColorMode);
}

impl<S: StyleSurface + ?Sized> StyleSurface for &mut S {
    fn set_property(&mut self, name: &str, value: &str) {
        (**self).set_property(name, value);
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        (**self).set_attribute(name, value);
    }

    fn set_color_scheme(&mut self, mode: ColorMode) {
        (**self).set_color_scheme(mode);
    }
}

/// Records theme output in insertion order.
///
/// Writing a name a second time replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySurface {
    properties: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    color_scheme: Option<ColorMode>,
}

impl PropertySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a custom property.
    pub fn property(&self, name: &str) -> Option<&str> {
        lookup(&self.properties, name)
    }

    /// Returns the value of a root attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)
    }

    pub fn color_scheme(&self) -> Option<ColorMode> {
        self.color_scheme
    }

    /// All custom properties, in the order they were first written.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.attributes.is_empty() && self.color_scheme.is_none()
    }

    /// Renders the surface as a single CSS rule.
    ///
    /// The selector is `:root` qualified by every recorded attribute:
    ///
    /// ```css
    /// :root[data-theme="dark"] {
    ///   color-scheme: dark;
    ///   --bg: #111218;
    /// }
    /// ```
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root");
        for (name, value) in &self.attributes {
            let _ = write!(css, "[{name}=\"{value}\"]");
        }
        css.push_str(" {\n");
        if let Some(mode) = self.color_scheme {
            let _ = writeln!(css, "  color-scheme: {mode};");
        }
        for (name, value) in &self.properties {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

impl StyleSurface for PropertySurface {
    fn set_property(&mut self, name: &str, value: &str) {
        upsert(&mut self.properties, name, value);
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        upsert(&mut self.attributes, name, value);
    }

    fn set_color_scheme(&mut self, mode: ColorMode) {
        self.color_scheme = Some(mode);
    }
}

fn lookup<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn upsert(entries: &mut Vec<(String, String)>, name: &str, value: &str) {
    match entries.iter_mut().find(|(key, _)| key == name) {
        Some((_, existing)) => value.clone_into(existing),
        None => entries.push((name.to_string(), value.to_string())),
    }
}
