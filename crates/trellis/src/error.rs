//! CLI error types.

use std::sync::Arc;

use trellis_build::{BuildError, OutlineError};
use trellis_config::ConfigError;
use trellis_nav::XrefError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Outline(#[from] Arc<OutlineError>),

    #[error("{0}")]
    Xref(#[from] XrefError),

    #[error("{0}")]
    Failed(String),
}
