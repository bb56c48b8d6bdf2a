//! Navigation fragments for trellis pages.
//!
//! - [`render_breadcrumbs`] / [`render_toc`]: outline walks pruned to the
//!   current page, or the full tree for the table of contents
//! - [`render_prev_next`]: links to the neighbouring pages of a folder
//! - [`section`]: anchored headings registered in a [`CrossReferenceStore`]
//!
//! Renderers read the host site through the [`SiteLinks`] trait;
//! [`SiteIndex`] is the in-memory implementation.
//!
//! # Example
//!
//! ```
//! use trellis_nav::{NavOptions, PageEntry, SiteIndex, render_breadcrumbs};
//!
//! let tree = trellis_outline::parse("Guide\n\tSetup\nFAQ\n").unwrap();
//! let site = SiteIndex::new()
//!     .with_page(PageEntry::new("Guide", "Guide", "guide.html"))
//!     .with_page(PageEntry::new("Setup", "Setup", "setup.html"))
//!     .with_page(PageEntry::new("FAQ", "FAQ", "faq.html"));
//!
//! let html = render_breadcrumbs(&tree, &site, "Setup", &NavOptions::default());
//! assert!(html.contains("<p><b>Setup</b></p>"));
//! ```

mod breadcrumbs;
mod links;
mod options;
mod prev_next;
mod site;
mod util;
mod xref;

pub use breadcrumbs::{render_breadcrumbs, render_navigation, render_toc};
pub use options::{DEFAULT_TOC_PAGE, NavOptions, UnlistedPage};
pub use prev_next::{NavLink, PrevNext, neighbors, render_prev_next, resolve_prev_next};
pub use site::{PageEntry, SiteIndex, SiteLinks};
pub use util::relative_href;
pub use xref::{
    CollisionPolicy, CrossReference, CrossReferenceStore, DEFAULT_PREFIX, XrefError, section,
};
