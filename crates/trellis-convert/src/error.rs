//! Conversion error type.

use std::process::ExitStatus;
use std::string::FromUtf8Error;
use std::time::Duration;

use crate::converter::ConverterKind;

/// Error returned when a converter cannot produce output.
///
/// Always fatal to the page being rendered. Never retried: external
/// converters may have side effects.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// No backend registered for this converter.
    #[error("{converter} converter is not configured")]
    Unavailable {
        /// Requested backend.
        converter: ConverterKind,
    },

    /// The converter process could not be started.
    #[error("failed to start {converter} converter `{program}`")]
    Spawn {
        /// Backend being run.
        converter: ConverterKind,
        /// Program that failed to start.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the converter process failed.
    #[error("I/O error while running {converter} converter")]
    Io {
        /// Backend being run.
        converter: ConverterKind,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The converter process exited unsuccessfully.
    #[error("{converter} converter exited with {status}: {stderr}")]
    Failed {
        /// Backend being run.
        converter: ConverterKind,
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error (trimmed).
        stderr: String,
    },

    /// The converter process exceeded its time budget and was killed.
    #[error("{converter} converter timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Backend being run.
        converter: ConverterKind,
        /// Configured timeout.
        timeout: Duration,
    },

    /// The converter produced output that is not UTF-8.
    #[error("{converter} converter produced invalid UTF-8")]
    InvalidUtf8 {
        /// Backend being run.
        converter: ConverterKind,
        /// Underlying error.
        #[source]
        source: FromUtf8Error,
    },

    /// An in-process converter rejected its input.
    #[error("{converter} conversion failed: {message}")]
    Compile {
        /// Backend being run.
        converter: ConverterKind,
        /// Backend error message.
        message: String,
    },
}

impl ConversionError {
    /// Backend that failed.
    #[must_use]
    pub fn converter(&self) -> ConverterKind {
        match self {
            Self::Unavailable { converter }
            | Self::Spawn { converter, .. }
            | Self::Io { converter, .. }
            | Self::Failed { converter, .. }
            | Self::Timeout { converter, .. }
            | Self::InvalidUtf8 { converter, .. }
            | Self::Compile { converter, .. } => *converter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_accessor() {
        let err = ConversionError::Timeout {
            converter: ConverterKind::Haml,
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.converter(), ConverterKind::Haml);
        assert_eq!(err.to_string(), "haml converter timed out after 250ms");
    }

    #[test]
    fn test_unavailable_message() {
        let err = ConversionError::Unavailable {
            converter: ConverterKind::Kramdown,
        };
        assert_eq!(err.to_string(), "kramdown converter is not configured");
    }
}
