//! Converter lookup by backend.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::command::CommandConverter;
use crate::converter::{Converter, ConverterKind};
use crate::error::ConversionError;
use crate::markdown::CmarkConverter;
use crate::options::{HamlOptions, KramdownOptions, ScssOptions};
use crate::scss::ScssConverter;

/// External commands for the process-backed converters.
///
/// Unset commands leave the backend unregistered, except Markdown which
/// falls back to [`CmarkConverter`].
#[derive(Debug, Clone, Default)]
pub struct CommandSettings {
    /// Markdown filter command.
    pub markdown: Option<String>,
    /// SmartyPants filter command.
    pub smartypants: Option<String>,
    /// Haml command.
    pub haml: Option<String>,
    /// Kramdown command.
    pub kramdown: Option<String>,
    /// Timeout applied to every command.
    pub timeout: Duration,
}

/// Converters available to the pipeline, keyed by backend.
#[derive(Default, Clone)]
pub struct ConverterRegistry {
    converters: HashMap<ConverterKind, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the in-process SCSS and Markdown backends.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new()
            .with(Arc::new(ScssConverter::new(ScssOptions::default())))
            .with(Arc::new(CmarkConverter))
    }

    /// Registry with built-ins plus the configured commands.
    ///
    /// Haml and Kramdown commands receive the arguments from
    /// [`HamlOptions::default`] and [`KramdownOptions::default`].
    #[must_use]
    pub fn from_settings(settings: &CommandSettings) -> Self {
        let command = |kind, program: &str, args: Vec<String>| -> Arc<dyn Converter> {
            Arc::new(
                CommandConverter::new(kind, program)
                    .with_args(args)
                    .with_timeout(settings.timeout),
            )
        };

        let mut registry = Self::with_builtins();
        if let Some(program) = &settings.markdown {
            registry.register(command(ConverterKind::Markdown, program, Vec::new()));
        }
        if let Some(program) = &settings.smartypants {
            registry.register(command(ConverterKind::SmartyPants, program, Vec::new()));
        }
        if let Some(program) = &settings.haml {
            registry.register(command(
                ConverterKind::Haml,
                program,
                HamlOptions::default().args(),
            ));
        }
        if let Some(program) = &settings.kramdown {
            registry.register(command(
                ConverterKind::Kramdown,
                program,
                KramdownOptions::default().args(),
            ));
        }
        registry
    }

    /// Register a converter, replacing any previous one for the same backend.
    pub fn register(&mut self, converter: Arc<dyn Converter>) -> Option<Arc<dyn Converter>> {
        self.converters.insert(converter.kind(), converter)
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, converter: Arc<dyn Converter>) -> Self {
        self.register(converter);
        self
    }

    /// Whether a backend is registered.
    #[must_use]
    pub fn is_available(&self, kind: ConverterKind) -> bool {
        self.converters.contains_key(&kind)
    }

    /// Look up a converter.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Unavailable` if no converter is registered.
    pub fn get(&self, kind: ConverterKind) -> Result<&dyn Converter, ConversionError> {
        self.converters
            .get(&kind)
            .map(Arc::as_ref)
            .ok_or(ConversionError::Unavailable { converter: kind })
    }

    /// Convert `input` with the converter registered for `kind`.
    pub fn convert(&self, kind: ConverterKind, input: &str) -> Result<String, ConversionError> {
        self.get(kind)?.convert(input)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.converters.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("converters", &kinds)
            .finish()
    }
}
