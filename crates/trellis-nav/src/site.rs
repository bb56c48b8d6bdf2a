//! Site collaborator used by the navigation renderers.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Lookups the renderers need from the host site.
///
/// Every miss is an ordinary outcome and yields `None` or an empty listing.
pub trait SiteLinks {
    /// Title and path of the page named `name`.
    fn title_and_path(&self, name: &str) -> Option<(String, String)>;

    /// Anchor tag for `title` pointing at `path`.
    fn link(&self, title: &str, path: &str) -> String {
        format!(r#"<a href="{path}">{title}</a>"#)
    }

    /// Names of the pages in the folder holding `name`, in listing order.
    fn folder_listing(&self, name: &str) -> Vec<String>;

    /// Value of `directive` for the page at `path`.
    fn directive(&self, directive: &str, path: &str) -> Option<String>;
}

/// One page known to a [`SiteIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Page name, as used in outlines.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Output path, relative to the site root.
    pub path: String,
    /// Folder the page lives in (empty for the site root).
    pub folder: String,
    /// Page directives such as `subtitle`.
    pub directives: HashMap<String, String>,
}

impl PageEntry {
    /// Entry in the root folder with no directives.
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            path: path.into(),
            folder: String::new(),
            directives: HashMap::new(),
        }
    }

    /// Set the folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Add a directive.
    #[must_use]
    pub fn with_directive(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.directives.insert(key.into(), value.into());
        self
    }
}

/// In-memory [`SiteLinks`] implementation.
///
/// Folder listings are ordered by page name.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    pages: HashMap<String, PageEntry>,
    path_index: HashMap<String, String>,
    folders: BTreeMap<String, BTreeSet<String>>,
}

impl SiteIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page, returning the entry it replaces.
    pub fn insert(&mut self, entry: PageEntry) -> Option<PageEntry> {
        let previous = self.pages.remove(&entry.name);
        if let Some(previous) = &previous {
            self.path_index.remove(&previous.path);
            if let Some(folder) = self.folders.get_mut(&previous.folder) {
                folder.remove(&previous.name);
            }
        }

        self.path_index.insert(entry.path.clone(), entry.name.clone());
        self.folders
            .entry(entry.folder.clone())
            .or_default()
            .insert(entry.name.clone());
        self.pages.insert(entry.name.clone(), entry);

        previous
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_page(mut self, entry: PageEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Page by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PageEntry> {
        self.pages.get(name)
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl SiteLinks for SiteIndex {
    fn title_and_path(&self, name: &str) -> Option<(String, String)> {
        self.pages
            .get(name)
            .map(|page| (page.title.clone(), page.path.clone()))
    }

    fn folder_listing(&self, name: &str) -> Vec<String> {
        self.pages
            .get(name)
            .and_then(|page| self.folders.get(&page.folder))
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn directive(&self, directive: &str, path: &str) -> Option<String> {
        self.path_index
            .get(path)
            .and_then(|name| self.pages.get(name))
            .and_then(|page| page.directives.get(directive))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> SiteIndex {
        SiteIndex::new()
            .with_page(PageEntry::new("b", "Bee", "guide/b.html").with_folder("guide"))
            .with_page(PageEntry::new("a", "Ay", "guide/a.html").with_folder("guide"))
            .with_page(
                PageEntry::new("c", "Sea", "guide/c.html")
                    .with_folder("guide")
                    .with_directive("subtitle", "The last one"),
            )
            .with_page(PageEntry::new("index", "Home", "index.html"))
    }

    #[test]
    fn test_title_and_path() {
        let site = index();

        assert_eq!(
            site.title_and_path("a"),
            Some(("Ay".to_owned(), "guide/a.html".to_owned()))
        );
        assert_eq!(site.title_and_path("missing"), None);
    }

    #[test]
    fn test_default_link() {
        assert_eq!(
            index().link("Ay", "guide/a.html"),
            r#"<a href="guide/a.html">Ay</a>"#
        );
    }

    #[test]
    fn test_folder_listing_is_sorted_by_name() {
        let site = index();

        assert_eq!(site.folder_listing("b"), ["a", "b", "c"]);
        assert_eq!(site.folder_listing("index"), ["index"]);
        assert!(site.folder_listing("missing").is_empty());
    }

    #[test]
    fn test_directive_by_path() {
        let site = index();

        assert_eq!(
            site.directive("subtitle", "guide/c.html").as_deref(),
            Some("The last one")
        );
        assert_eq!(site.directive("subtitle", "guide/a.html"), None);
        assert_eq!(site.directive("subtitle", "nowhere.html"), None);
    }

    #[test]
    fn test_insert_replaces_and_moves_folder() {
        let mut site = index();

        let previous = site.insert(PageEntry::new("a", "Ay again", "other/a.html").with_folder("other"));

        assert_eq!(previous.map(|p| p.title), Some("Ay".to_owned()));
        assert_eq!(site.len(), 4);
        assert_eq!(site.folder_listing("b"), ["b", "c"]);
        assert_eq!(site.folder_listing("a"), ["a"]);
        assert_eq!(site.directive("subtitle", "guide/a.html"), None);
    }
}
