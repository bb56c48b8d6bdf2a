//! In-process SCSS compilation.

use grass::{InputSyntax, Options, OutputStyle};

use crate::converter::{Converter, ConverterKind};
use crate::error::ConversionError;
use crate::options::{ScssOptions, ScssStyle};

/// SCSS to CSS converter backed by `grass`.
///
/// `@import` and `@use` resolve against the process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScssConverter {
    options: ScssOptions,
}

impl ScssConverter {
    /// Create a converter with the given options.
    #[must_use]
    pub fn new(options: ScssOptions) -> Self {
        Self { options }
    }
}

impl Converter for ScssConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::Scss
    }

    fn convert(&self, input: &str) -> Result<String, ConversionError> {
        let style = match self.options.style {
            ScssStyle::Expanded => OutputStyle::Expanded,
            ScssStyle::Compressed => OutputStyle::Compressed,
        };
        let options = Options::default()
            .input_syntax(InputSyntax::Scss)
            .style(style);

        grass::from_string(input, &options).map_err(|e| ConversionError::Compile {
            converter: ConverterKind::Scss,
            message: e.to_string(),
        })
    }
}
