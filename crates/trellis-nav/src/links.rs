//! Anchor construction relative to the page being rendered.

use trellis_outline::{NodeId, OutlineTree};

use crate::site::SiteLinks;
use crate::util::relative_href;

/// Builds anchors for one page render.
pub(crate) struct Linker<'a> {
    site: &'a dyn SiteLinks,
    base: Option<String>,
}

impl<'a> Linker<'a> {
    /// Linker for `current_page`; hrefs are relative to its path when
    /// `relative` is set and the page is known.
    pub(crate) fn new(site: &'a dyn SiteLinks, current_page: &str, relative: bool) -> Self {
        let base = if relative {
            site.title_and_path(current_page).map(|(_, path)| path)
        } else {
            None
        };
        Self { site, base }
    }

    pub(crate) fn site(&self) -> &'a dyn SiteLinks {
        self.site
    }

    pub(crate) fn anchor(&self, title: &str, path: &str) -> String {
        match &self.base {
            Some(base) => self.site.link(title, &relative_href(base, path)),
            None => self.site.link(title, path),
        }
    }

    /// Title and site path for an outline node.
    ///
    /// The site's entry wins; the outline's own attributes fill in for
    /// pages the site does not know.
    pub(crate) fn resolve(&self, tree: &OutlineTree, id: NodeId) -> (String, String) {
        let node = tree.node(id);
        self.site.title_and_path(&node.name).unwrap_or_else(|| {
            (
                node.display_title().to_owned(),
                node.path.clone().unwrap_or_default(),
            )
        })
    }
}
