//! Link path helpers.

/// Compute the relative href from page `from` to page `to`.
///
/// Both are site-relative paths. The last segment of `from` is the document
/// and is dropped to get the base directory (RFC 3986). A link to `from`
/// itself is the empty same-document reference.
///
/// # Examples
///
/// ```
/// use trellis_nav::relative_href;
///
/// assert_eq!(relative_href("guide/setup.html", "guide/usage.html"), "usage.html");
/// assert_eq!(relative_href("guide/setup.html", "index.html"), "../index.html");
/// assert_eq!(relative_href("index.html", "guide/setup.html"), "guide/setup.html");
/// assert_eq!(relative_href("guide/setup.html", "guide/setup.html"), "");
/// ```
#[must_use]
pub fn relative_href(from: &str, to: &str) -> String {
    let from = from.trim_start_matches('/');
    let to = to.trim_start_matches('/');
    if from == to {
        return String::new();
    }

    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let from_dir = if from.ends_with('/') || from_segs.is_empty() {
        &from_segs[..]
    } else {
        &from_segs[..from_segs.len() - 1]
    };

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = "../".repeat(from_dir.len() - common);
    let result = format!("{ups}{}", to_segs[common..].join("/"));
    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}
