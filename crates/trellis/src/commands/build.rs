//! `trellis build` command implementation.

use std::path::PathBuf;

use clap::Args;
use trellis_build::{BuildSession, SessionConfig};
use trellis_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover trellis.toml).
    #[arg(short, long, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// Page source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Navigation outline document (overrides config).
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Converter timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the source directory is
    /// missing, or any page fails to render.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            outline: self.outline,
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let session_config = SessionConfig::from_config(&config);

        output.info(&format!("Source: {}", session_config.source_dir.display()));
        output.info(&format!("Output: {}", session_config.output_dir.display()));

        let session = BuildSession::new(session_config);
        let report = session.build_all()?;

        for failure in &report.failed {
            output.error(&failure.to_string());
        }
        if report.cancelled {
            output.warning("Build cancelled");
        }

        output.success(&format!(
            "Rendered {} pages and {} stylesheets",
            report.rendered.len(),
            report.stylesheets.len()
        ));
        let xrefs = session.cross_references().len();
        if xrefs > 0 {
            output.info(&format!("Registered {xrefs} cross-references"));
        }

        if report.failed.is_empty() {
            Ok(())
        } else {
            Err(CliError::Failed(format!(
                "{} of {} pages failed",
                report.failed.len(),
                report.failed.len() + report.rendered.len()
            )))
        }
    }
}
