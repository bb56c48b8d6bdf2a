//! Previous/next links within a folder.

use std::fmt::Write;

use crate::links::Linker;
use crate::options::NavOptions;
use crate::site::SiteLinks;

/// Resolved link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Display title.
    pub title: String,
    /// Site path.
    pub path: String,
}

/// Neighbours of a page in its folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrevNext {
    /// Preceding page.
    pub prev: Option<NavLink>,
    /// Following page.
    pub next: Option<NavLink>,
}

/// Entries immediately before and after `current` in `listing`.
///
/// Both are `None` when `current` is not listed.
#[must_use]
pub fn neighbors<'a>(listing: &'a [String], current: &str) -> (Option<&'a str>, Option<&'a str>) {
    let Some(pos) = listing.iter().position(|name| name == current) else {
        return (None, None);
    };
    let prev = pos.checked_sub(1).map(|i| listing[i].as_str());
    let next = listing.get(pos + 1).map(String::as_str);
    (prev, next)
}

/// Resolve the previous and next pages of `current_page`.
#[must_use]
pub fn resolve_prev_next(site: &dyn SiteLinks, current_page: &str) -> PrevNext {
    let listing = site.folder_listing(current_page);
    let (prev, next) = neighbors(&listing, current_page);
    PrevNext {
        prev: prev.map(|name| nav_link(site, name)),
        next: next.map(|name| nav_link(site, name)),
    }
}

/// Render the previous/next block for `current_page`.
///
/// A missing neighbour leaves its paragraph empty so the layout stays put.
#[must_use]
pub fn render_prev_next(site: &dyn SiteLinks, current_page: &str, options: &NavOptions) -> String {
    let linker = Linker::new(site, current_page, options.relative_links);
    let PrevNext { prev, next } = resolve_prev_next(site, current_page);
    let label = |prefix: &str, link: Option<NavLink>| {
        link.map(|link| format!("{prefix}: {}", linker.anchor(&link.title, &link.path)))
            .unwrap_or_default()
    };

    let mut html = String::new();
    let _ = writeln!(html, "<p class='prevlink'>{}</p>", label("Prev", prev));
    let _ = writeln!(html, "<p class='nextlink'>{}</p>", label("Next", next));
    html.push_str("<div style='clear:both' />\n");
    html
}

/// Link for a listed page; unknown pages use their name as title and path.
fn nav_link(site: &dyn SiteLinks, name: &str) -> NavLink {
    let (title, path) = site
        .title_and_path(name)
        .unwrap_or_else(|| (name.to_owned(), name.to_owned()));
    NavLink { title, path }
}
