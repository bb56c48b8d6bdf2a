//! Build error types.

use std::path::PathBuf;
use std::sync::Arc;

use trellis_nav::XrefError;
use trellis_outline::ParseError;
use trellis_pipeline::PipelineError;

/// Why the navigation outline is unavailable.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    /// No outline path is configured.
    #[error("No outline document configured")]
    NotConfigured,

    /// The outline file could not be read.
    #[error("Cannot read outline {}: {source}", .path.display())]
    Read {
        /// Outline path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The outline document is malformed.
    #[error("Invalid outline {}: {source}", .path.display())]
    Parse {
        /// Outline path.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: ParseError,
    },
}

/// Error rendering a single page or stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A pipeline stage failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The front matter block is not valid.
    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    /// A section heading was rejected by the cross-reference table.
    #[error(transparent)]
    Xref(#[from] XrefError),

    /// Navigation was requested but the outline is unavailable.
    #[error("Navigation unavailable: {0}")]
    Outline(#[from] Arc<OutlineError>),

    /// A source or template file could not be read.
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Whether the error is a cancellation rather than a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Pipeline(PipelineError::Cancelled { .. }))
    }
}

/// Failure of one page, isolated from the rest of the build.
#[derive(Debug, thiserror::Error)]
#[error("{page}: {source}")]
pub struct PageError {
    /// Page name or stylesheet path.
    pub page: String,
    /// What went wrong.
    #[source]
    pub source: RenderError,
}

impl PageError {
    pub(crate) fn new(page: impl Into<String>, source: impl Into<RenderError>) -> Self {
        Self {
            page: page.into(),
            source: source.into(),
        }
    }
}

/// Site-wide build failure.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source or output directory could not be accessed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Directory or file path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
}
