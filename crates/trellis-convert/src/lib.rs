//! Pluggable markup converters for trellis.
//!
//! Every converter is a pure text-to-text function behind the [`Converter`]
//! trait. Pipeline stages look converters up by [`ConverterKind`] in a
//! [`ConverterRegistry`] and never care how the conversion happens.
//!
//! # Backends
//!
//! - [`CommandConverter`]: runs an external filter process (stdin to stdout)
//!   with a timeout. Used for Markdown.pl, SmartyPants, Haml and Kramdown.
//! - [`ScssConverter`]: compiles SCSS in-process with `grass`.
//! - [`CmarkConverter`]: in-process Markdown with `pulldown-cmark`, used when
//!   no Markdown command is configured.
//!
//! # Example
//!
//! ```
//! use trellis_convert::{ConverterKind, ConverterRegistry};
//!
//! let registry = ConverterRegistry::with_builtins();
//! let css = registry.convert(ConverterKind::Scss, "a { b { color: red; } }").unwrap();
//! assert!(css.contains("a b"));
//! ```

mod command;
mod converter;
mod error;
mod markdown;
mod options;
mod registry;
mod scss;

pub use command::CommandConverter;
pub use converter::{Converter, ConverterKind};
pub use error::ConversionError;
pub use markdown::CmarkConverter;
pub use options::{AttrWrapper, EntityOutput, HamlOptions, KramdownOptions, ScssOptions, ScssStyle};
pub use registry::{CommandSettings, ConverterRegistry};
pub use scss::ScssConverter;
