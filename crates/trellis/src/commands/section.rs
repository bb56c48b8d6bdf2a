//! `trellis section` command implementation.

use std::path::PathBuf;

use clap::Args;
use trellis_build::SessionConfig;
use trellis_config::{CliSettings, Config};
use trellis_nav::{CrossReferenceStore, section};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the section command.
#[derive(Args)]
pub(crate) struct SectionArgs {
    /// Path to configuration file (default: auto-discover trellis.toml).
    #[arg(short, long, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// Slug prefix (overrides config).
    #[arg(long)]
    prefix: Option<String>,

    /// Heading text.
    heading: String,
}

impl SectionArgs {
    /// Execute the section command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&CliSettings::default()))?;
        let session_config = SessionConfig::from_config(&config);
        let prefix = self.prefix.unwrap_or(session_config.xref_prefix);
        let store = CrossReferenceStore::new(prefix, session_config.collisions);

        let html = section(&store, &self.heading)?;

        output.result(&html);
        output.highlight(&format!("Slug: {}", store.slug(&self.heading)));
        Ok(())
    }
}
