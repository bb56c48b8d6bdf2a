//! Navigation rendering options.

/// Page identity reserved for the table of contents.
pub const DEFAULT_TOC_PAGE: &str = "toc";

/// What breadcrumbs show for a page missing from the outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnlistedPage {
    /// Render the whole tree unpruned, still as breadcrumbs.
    #[default]
    FullTree,
    /// Render nothing.
    Omit,
}

/// Options shared by the navigation renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavOptions {
    /// Page identity that renders as the table of contents.
    pub toc_page: String,
    /// Handling of pages absent from the outline.
    pub unlisted_page: UnlistedPage,
    /// Emit hrefs relative to the current page instead of site paths.
    pub relative_links: bool,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            toc_page: DEFAULT_TOC_PAGE.to_owned(),
            unlisted_page: UnlistedPage::default(),
            relative_links: false,
        }
    }
}
