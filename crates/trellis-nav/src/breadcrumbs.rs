//! Breadcrumb and table-of-contents rendering.
//!
//! Both walk the outline from the body root, emitting one `<p>` per entry
//! and wrapping each expanded level in `<div class='toc_level'>`. An entry's
//! children are expanded only when there is no current page, or the entry is
//! the current page or one of its ancestors. Sibling branches collapse.

use std::fmt::Write;

use trellis_outline::{NodeId, OutlineTree};

use crate::links::Linker;
use crate::options::{NavOptions, UnlistedPage};
use crate::site::SiteLinks;

/// Directive holding a page's subtitle.
const SUBTITLE_DIRECTIVE: &str = "subtitle";

/// Render breadcrumbs, or the table of contents when `toc_mode` is set or
/// `current_page` is the TOC identity.
///
/// The table of contents has no current entry, shows the whole tree, and
/// appends subtitles. A page missing from the outline is handled according
/// to [`NavOptions::unlisted_page`].
#[must_use]
pub fn render_navigation(
    tree: &OutlineTree,
    site: &dyn SiteLinks,
    current_page: &str,
    toc_mode: bool,
    options: &NavOptions,
) -> String {
    let toc_mode = toc_mode || current_page == options.toc_page;
    let current = if toc_mode {
        None
    } else {
        tree.find_by_name(current_page)
    };

    if !toc_mode && current.is_none() {
        tracing::debug!(page = current_page, "Page is not listed in the outline");
        if options.unlisted_page == UnlistedPage::Omit {
            return String::new();
        }
    }

    let renderer = Renderer {
        tree,
        linker: Linker::new(site, current_page, options.relative_links),
        current,
        subtitles: toc_mode,
    };

    let mut html = String::new();
    let class = if toc_mode { "toc" } else { "breadcrumbs" };
    let _ = write!(html, "<div class='{class}'>");
    renderer.render_level(tree.root(), &mut html);
    html.push_str("</div><div style='clear:both'></div>");
    html
}

/// Render breadcrumbs for `current_page`.
#[must_use]
pub fn render_breadcrumbs(
    tree: &OutlineTree,
    site: &dyn SiteLinks,
    current_page: &str,
    options: &NavOptions,
) -> String {
    render_navigation(tree, site, current_page, false, options)
}

/// Render the table of contents.
#[must_use]
pub fn render_toc(
    tree: &OutlineTree,
    site: &dyn SiteLinks,
    current_page: &str,
    options: &NavOptions,
) -> String {
    render_navigation(tree, site, current_page, true, options)
}

struct Renderer<'a> {
    tree: &'a OutlineTree,
    linker: Linker<'a>,
    current: Option<NodeId>,
    subtitles: bool,
}

impl Renderer<'_> {
    fn render_level(&self, parent: NodeId, html: &mut String) {
        for &child in self.tree.children(parent) {
            let (title, path) = self.linker.resolve(self.tree, child);

            if Some(child) == self.current {
                let _ = writeln!(html, "<p><b>{title}</b></p>");
            } else {
                let link = self.linker.anchor(&title, &path);
                match self.subtitle(&path) {
                    Some(subtitle) => {
                        let _ = writeln!(
                            html,
                            "<p>{link} <span class='subtitle'>{subtitle}</span></p>"
                        );
                    }
                    None => {
                        let _ = writeln!(html, "<p>{link}</p>");
                    }
                }
            }

            if self.tree.has_children(child) && self.expands(child) {
                html.push_str("<div class='toc_level'>\n");
                self.render_level(child, html);
                html.push_str("</div>\n");
            }
        }
    }

    fn expands(&self, id: NodeId) -> bool {
        match self.current {
            None => true,
            Some(current) => current == id || self.tree.is_ancestor_of(id, current),
        }
    }

    fn subtitle(&self, path: &str) -> Option<String> {
        if !self.subtitles || path.is_empty() {
            return None;
        }
        self.linker.site().directive(SUBTITLE_DIRECTIVE, path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis_outline::{OutlineNode, OutlineTreeBuilder};

    use super::*;
    use crate::site::{PageEntry, SiteIndex};

    /// Root -> {A -> {A1 -> {A1x}, A2 -> {A2x}}, B -> {B1}}
    fn tree() -> OutlineTree {
        let mut builder = OutlineTreeBuilder::new();
        let root = builder.root();
        let a = builder.add_node(root, OutlineNode::named("A"));
        let a1 = builder.add_node(a, OutlineNode::named("A1"));
        builder.add_node(a1, OutlineNode::named("A1x"));
        let a2 = builder.add_node(a, OutlineNode::named("A2"));
        builder.add_node(a2, OutlineNode::named("A2x"));
        let b = builder.add_node(root, OutlineNode::named("B"));
        builder.add_node(b, OutlineNode::named("B1"));
        builder.build()
    }

    fn site() -> SiteIndex {
        ["A", "A1", "A1x", "A2", "A2x", "B", "B1"]
            .into_iter()
            .fold(SiteIndex::new(), |site, name| {
                site.with_page(PageEntry::new(
                    name,
                    format!("{name} title"),
                    format!("{}.html", name.to_lowercase()),
                ))
            })
    }

    #[test]
    fn test_breadcrumbs_prune_to_current_path() {
        let html = render_breadcrumbs(&tree(), &site(), "A1", &NavOptions::default());

        assert_eq!(
            html,
            "<div class='breadcrumbs'>\
             <p><a href=\"a.html\">A title</a></p>\n\
             <div class='toc_level'>\n\
             <p><b>A1 title</b></p>\n\
             <div class='toc_level'>\n\
             <p><a href=\"a1x.html\">A1x title</a></p>\n\
             </div>\n\
             <p><a href=\"a2.html\">A2 title</a></p>\n\
             </div>\n\
             <p><a href=\"b.html\">B title</a></p>\n\
             </div><div style='clear:both'></div>"
        );
    }

    #[test]
    fn test_breadcrumbs_leaf_current_expands_ancestors_only() {
        let html = render_breadcrumbs(&tree(), &site(), "B1", &NavOptions::default());

        assert!(html.contains("<p><b>B1 title</b></p>"));
        assert!(!html.contains("A1 title"));
        assert!(html.contains("<p><a href=\"a.html\">A title</a></p>"));
    }

    #[test]
    fn test_toc_page_renders_full_tree_with_subtitles() {
        let site = site()
            .with_page(PageEntry::new("A2", "A2 title", "a2.html").with_directive("subtitle", "Second"));

        let html = render_breadcrumbs(&tree(), &site, "toc", &NavOptions::default());

        assert!(html.starts_with("<div class='toc'>"));
        assert!(!html.contains("<b>"));
        for name in ["A1x", "A2x", "B1"] {
            assert!(html.contains(&format!("{name} title")), "{name} missing");
        }
        assert!(html.contains(
            "<p><a href=\"a2.html\">A2 title</a> <span class='subtitle'>Second</span></p>\n"
        ));
    }

    #[test]
    fn test_toc_mode_on_listed_page() {
        let html = render_toc(&tree(), &site(), "A1", &NavOptions::default());

        assert!(html.starts_with("<div class='toc'>"));
        assert!(html.contains("<p><a href=\"a1.html\">A1 title</a></p>"));
        assert!(html.contains("B1 title"));
    }

    #[test]
    fn test_unlisted_page_full_tree() {
        let html = render_breadcrumbs(&tree(), &site(), "stale", &NavOptions::default());

        assert!(html.starts_with("<div class='breadcrumbs'>"));
        assert!(html.contains("A2x title"));
        assert!(html.contains("B1 title"));
        assert!(!html.contains("subtitle"));
    }

    #[test]
    fn test_unlisted_page_omitted() {
        let options = NavOptions {
            unlisted_page: UnlistedPage::Omit,
            ..NavOptions::default()
        };

        assert_eq!(render_breadcrumbs(&tree(), &site(), "stale", &options), "");
        assert!(!render_breadcrumbs(&tree(), &site(), "toc", &options).is_empty());
    }

    #[test]
    fn test_leaf_never_gets_empty_level() {
        let html = render_breadcrumbs(&tree(), &site(), "A1x", &NavOptions::default());

        assert!(!html.contains("<div class='toc_level'>\n</div>"));
        assert_eq!(html.matches("<div class='toc_level'>").count(), 2);
    }

    #[test]
    fn test_outline_attributes_used_for_unknown_pages() {
        let mut builder = OutlineTreeBuilder::new();
        let root = builder.root();
        builder.add_node(
            root,
            OutlineNode::named("ext").with_title("External").with_path("https://example.com/"),
        );
        builder.add_node(root, OutlineNode::named("bare"));
        let tree = builder.build();

        let html = render_breadcrumbs(&tree, &SiteIndex::new(), "ext", &NavOptions::default());

        assert!(html.contains("<p><b>External</b></p>"));
        assert!(html.contains("<p><a href=\"\">bare</a></p>"));
    }

    #[test]
    fn test_relative_links() {
        let site = SiteIndex::new()
            .with_page(PageEntry::new("A", "A", "guide/a.html"))
            .with_page(PageEntry::new("B", "B", "index.html"));
        let mut builder = OutlineTreeBuilder::new();
        let root = builder.root();
        builder.add_node(root, OutlineNode::named("A"));
        builder.add_node(root, OutlineNode::named("B"));
        let tree = builder.build();
        let options = NavOptions {
            relative_links: true,
            ..NavOptions::default()
        };

        let html = render_toc(&tree, &site, "A", &options);

        assert!(html.contains("<p><a href=\"\">A</a></p>"));
        assert!(html.contains("<p><a href=\"../index.html\">B</a></p>"));
    }

    #[test]
    fn test_custom_link_format() {
        struct Plain;

        impl SiteLinks for Plain {
            fn title_and_path(&self, name: &str) -> Option<(String, String)> {
                Some((name.to_uppercase(), format!("/{name}")))
            }

            fn link(&self, title: &str, path: &str) -> String {
                format!("[{title}]({path})")
            }

            fn folder_listing(&self, _name: &str) -> Vec<String> {
                Vec::new()
            }

            fn directive(&self, _directive: &str, _path: &str) -> Option<String> {
                None
            }
        }

        let html = render_breadcrumbs(&tree(), &Plain, "B", &NavOptions::default());

        assert!(html.contains("<p>[A](/A)</p>"));
        assert!(html.contains("<p><b>B</b></p>"));
        assert!(html.contains("<p>[B1](/B1)</p>"));
    }
}
