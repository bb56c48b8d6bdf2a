//! Converter trait and backend identities.

use std::fmt;

use crate::error::ConversionError;

/// Identity of a markup backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    /// SCSS to CSS.
    Scss,
    /// Markdown to HTML.
    Markdown,
    /// Haml to HTML.
    Haml,
    /// Kramdown to HTML.
    Kramdown,
    /// Typographic quotes and dashes.
    SmartyPants,
}

impl ConverterKind {
    /// All backends, in pipeline order of first use.
    pub const ALL: [Self; 5] = [
        Self::Scss,
        Self::Markdown,
        Self::Haml,
        Self::Kramdown,
        Self::SmartyPants,
    ];

    /// Lowercase backend name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scss => "scss",
            Self::Markdown => "markdown",
            Self::Haml => "haml",
            Self::Kramdown => "kramdown",
            Self::SmartyPants => "smartypants",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text-to-text markup converter.
///
/// Implementations must be deterministic for a given input and must not
/// return partial output on failure.
pub trait Converter: Send + Sync {
    /// Backend this converter implements.
    fn kind(&self) -> ConverterKind;

    /// Convert `input`, returning the rendered text.
    fn convert(&self, input: &str) -> Result<String, ConversionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        for kind in ConverterKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = ConverterKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ConverterKind::ALL.len());
    }
}
