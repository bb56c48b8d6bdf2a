//! Per-page render context.

use std::fmt;
use std::path::{Path, PathBuf};

/// Converter switches for one page.
///
/// Set once when the context is built; stages read them and never clear them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContextFlags {
    /// Body is Markdown.
    pub markdown: bool,
    /// Post-macro text is Kramdown.
    pub kramdown: bool,
    /// Body contains `<%%% ... %%%>` Haml regions.
    #[cfg_attr(feature = "serde", serde(rename = "embeddedhaml"))]
    pub embedded_haml: bool,
    /// Template file is Haml.
    #[cfg_attr(feature = "serde", serde(rename = "hamltemplate"))]
    pub haml_template: bool,
    /// Apply typographic quotes to the rendered page.
    pub smartypants: bool,
}

/// How the stylesheet attached to a context is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StylesheetKind {
    /// Plain CSS, passed through.
    #[default]
    Plain,
    /// The designated SCSS sheet.
    Scss,
}

impl StylesheetKind {
    /// Classify a sheet by identifier.
    ///
    /// Only the sheet named `scss_sheet` is SCSS; content is never sniffed.
    #[must_use]
    pub fn for_sheet(sheet_name: &str, scss_sheet: &str) -> Self {
        if sheet_name == scss_sheet {
            Self::Scss
        } else {
            Self::Plain
        }
    }
}

/// Text fields of a [`RenderContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Stylesheet source.
    CssText,
    /// Page body before macro expansion.
    BodyText,
    /// Page body after macro expansion.
    PostMacroText,
    /// Page inserted into its template.
    RenderedText,
    /// Template rendered from Haml.
    DirectTemplate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CssText => "csstext",
            Self::BodyText => "bodytext",
            Self::PostMacroText => "postmacrotext",
            Self::RenderedText => "renderedtext",
            Self::DirectTemplate => "directTemplate",
        })
    }
}

/// State of one page as it moves through the pipeline.
///
/// Created by the host per page, threaded through the stages in order, and
/// dropped once the rendered text has been captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    page: String,
    flags: ContextFlags,
    stylesheet_kind: StylesheetKind,
    template_path: Option<PathBuf>,
    css_text: String,
    body_text: String,
    post_macro_text: String,
    rendered_text: String,
    direct_template: Option<String>,
}

impl RenderContext {
    /// Create a context for `page` with the given flags and empty fields.
    #[must_use]
    pub fn new(page: impl Into<String>, flags: ContextFlags) -> Self {
        Self {
            page: page.into(),
            flags,
            ..Self::default()
        }
    }

    /// Set the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body_text = body.into();
        self
    }

    /// Attach stylesheet text and its kind.
    #[must_use]
    pub fn with_stylesheet(mut self, kind: StylesheetKind, css: impl Into<String>) -> Self {
        self.stylesheet_kind = kind;
        self.css_text = css.into();
        self
    }

    /// Set the template path.
    #[must_use]
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Page identity.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Converter flags.
    #[must_use]
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Stylesheet kind.
    #[must_use]
    pub fn stylesheet_kind(&self) -> StylesheetKind {
        self.stylesheet_kind
    }

    /// Template path, if the page has one.
    #[must_use]
    pub fn template_path(&self) -> Option<&Path> {
        self.template_path.as_deref()
    }

    /// Read a field. `None` only for an unset direct template.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::CssText => Some(&self.css_text),
            Field::BodyText => Some(&self.body_text),
            Field::PostMacroText => Some(&self.post_macro_text),
            Field::RenderedText => Some(&self.rendered_text),
            Field::DirectTemplate => self.direct_template.as_deref(),
        }
    }

    /// Replace a field.
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::CssText => self.css_text = value,
            Field::BodyText => self.body_text = value,
            Field::PostMacroText => self.post_macro_text = value,
            Field::RenderedText => self.rendered_text = value,
            Field::DirectTemplate => self.direct_template = Some(value),
        }
    }

    /// Stylesheet text.
    #[must_use]
    pub fn css_text(&self) -> &str {
        &self.css_text
    }

    /// Body text.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Post-macro text.
    #[must_use]
    pub fn post_macro_text(&self) -> &str {
        &self.post_macro_text
    }

    /// Rendered text.
    #[must_use]
    pub fn rendered_text(&self) -> &str {
        &self.rendered_text
    }

    /// Template rendered by the body stage, if any.
    #[must_use]
    pub fn direct_template(&self) -> Option<&str> {
        self.direct_template.as_deref()
    }

    /// Consume the context, returning the rendered text.
    #[must_use]
    pub fn into_rendered_text(self) -> String {
        self.rendered_text
    }
}
