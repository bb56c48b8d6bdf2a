//! Pipeline stages and their error type.

use std::fmt;
use std::path::PathBuf;

use trellis_convert::ConversionError;

/// A named pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Stylesheet compilation.
    Style,
    /// Body conversion before macro expansion.
    Body,
    /// Conversion after macro expansion.
    PostMacro,
    /// Cleanup of the fully rendered page.
    Final,
}

impl Stage {
    /// Stages in the order the host runs them.
    pub const ORDER: [Self; 4] = [Self::Style, Self::Body, Self::PostMacro, Self::Final];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Style => "style",
            Self::Body => "body",
            Self::PostMacro => "post-macro",
            Self::Final => "final",
        })
    }
}

/// Error that aborts a page's render.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A converter failed.
    #[error("{stage} stage failed: {source}")]
    Conversion {
        /// Stage that invoked the converter.
        stage: Stage,
        /// Converter error.
        #[source]
        source: ConversionError,
    },

    /// The Haml template could not be read.
    #[error("{stage} stage failed: cannot read template {}: {source}", .path.display())]
    Template {
        /// Stage that read the template.
        stage: Stage,
        /// Template path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The build was cancelled before the stage ran.
    #[error("{stage} stage cancelled")]
    Cancelled {
        /// Stage that was about to run.
        stage: Stage,
    },
}

impl PipelineError {
    /// Stage that failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Conversion { stage, .. }
            | Self::Template { stage, .. }
            | Self::Cancelled { stage } => *stage,
        }
    }
}
