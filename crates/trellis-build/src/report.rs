//! Build outcome.

use crate::error::PageError;

/// What a [`BuildSession::build_all`](crate::BuildSession::build_all) run produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output paths of rendered pages, relative to the output directory.
    pub rendered: Vec<String>,
    /// Output paths of compiled stylesheets.
    pub stylesheets: Vec<String>,
    /// Pages and stylesheets that failed.
    pub failed: Vec<PageError>,
    /// The build stopped early on cancellation.
    pub cancelled: bool,
}

impl BuildReport {
    /// Whether every page and stylesheet was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}
