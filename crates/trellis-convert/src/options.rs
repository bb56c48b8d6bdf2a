//! Backend options and their command-line spellings.

/// Quote character Haml wraps attribute values in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttrWrapper {
    /// `class="x"`
    #[default]
    Double,
    /// `class='x'`
    Single,
}

/// Haml rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HamlOptions {
    /// Attribute quote style.
    pub attr_wrapper: AttrWrapper,
    /// Emit compact ("ugly") output without indentation.
    pub compact: bool,
}

impl Default for HamlOptions {
    fn default() -> Self {
        Self {
            attr_wrapper: AttrWrapper::Double,
            compact: true,
        }
    }
}

impl HamlOptions {
    /// Arguments for the `haml` command.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.attr_wrapper == AttrWrapper::Double {
            args.push("--double-quote-attributes".to_owned());
        }
        if self.compact {
            args.extend(["--style".to_owned(), "ugly".to_owned()]);
        }
        args
    }
}

/// How Kramdown writes HTML entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityOutput {
    /// `&#8220;`
    #[default]
    Numeric,
    /// `&ldquo;`
    Symbolic,
    /// The literal character.
    AsChar,
    /// Whatever the input used.
    AsInput,
}

impl EntityOutput {
    fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Symbolic => "symbolic",
            Self::AsChar => "as_char",
            Self::AsInput => "as_input",
        }
    }
}

/// Kramdown rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KramdownOptions {
    /// Generate `id` attributes for headings.
    pub auto_ids: bool,
    /// Entity style.
    pub entity_output: EntityOutput,
}

impl Default for KramdownOptions {
    fn default() -> Self {
        Self {
            auto_ids: false,
            entity_output: EntityOutput::Numeric,
        }
    }
}

impl KramdownOptions {
    /// Arguments for the `kramdown` command.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let ids = if self.auto_ids { "--auto-ids" } else { "--no-auto-ids" };
        vec![
            ids.to_owned(),
            "--entity-output".to_owned(),
            self.entity_output.as_str().to_owned(),
        ]
    }
}

/// CSS output formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScssStyle {
    /// One declaration per line.
    #[default]
    Expanded,
    /// Minified.
    Compressed,
}

/// SCSS compilation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScssOptions {
    /// Output style.
    pub style: ScssStyle,
}
