//! `trellis nav` command implementation.

use std::path::PathBuf;

use clap::Args;
use trellis_build::{BuildSession, SessionConfig};
use trellis_config::{CliSettings, Config};
use trellis_nav::{render_navigation, render_prev_next};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover trellis.toml).
    #[arg(short, long, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// Navigation outline document (overrides config).
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Page name to render navigation for.
    #[arg(short, long)]
    page: String,

    /// Render the table of contents instead of breadcrumbs.
    #[arg(long)]
    toc: bool,

    /// Append the previous/next links.
    #[arg(long)]
    prev_next: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the outline cannot be
    /// loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            outline: self.outline,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let session = BuildSession::new(SessionConfig::from_config(&config));

        let outline = session.outline()?;
        let site = session.site_index(&session.discover());
        let options = &session.config().navigation;

        if site.get(&self.page).is_none() {
            output.warning(&format!("Page {} not found in source directory", self.page));
        }

        output.result(&render_navigation(
            &outline, &site, &self.page, self.toc, options,
        ));
        if self.prev_next {
            output.result(&render_prev_next(&site, &self.page, options));
        }
        Ok(())
    }
}
