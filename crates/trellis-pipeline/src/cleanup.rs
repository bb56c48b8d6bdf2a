//! Text patches applied around converter output.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::haml::HAML_CLOSE;

/// [`HAML_CLOSE`] as escaped by a Markdown converter.
const ESCAPED_HAML_CLOSE: &str = "%%%&gt;";

/// A macro whose opener has been repaired but whose closer is still escaped.
static HALF_ESCAPED_MACRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<%(.*?)%&gt;").unwrap());

/// `<a href="">TEXT</a>` on a single line.
static SELF_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="">(.*?)</a>"#).unwrap());

/// Undo Markdown escaping of macro delimiters.
///
/// Markdown converters escape `<%` as `&lt;%`, which would stop macro
/// expansion. Every `&lt;%` becomes `<%`, and a `%&gt;` closing such a
/// repaired opener on the same line becomes `%>`. An escaped Haml closer
/// `%%%&gt;` is restored on any line.
#[must_use]
pub fn repair_macro_escapes(html: &str) -> String {
    if !html.contains("&lt;%") && !html.contains(ESCAPED_HAML_CLOSE) {
        return html.to_owned();
    }
    let opened = html.replace("&lt;%", "<%");
    HALF_ESCAPED_MACRO_RE
        .replace_all(&opened, "<%${1}%>")
        .replace(ESCAPED_HAML_CLOSE, HAML_CLOSE)
}

/// Replace links with an empty `href` by their text.
#[must_use]
pub fn strip_self_links(html: &str) -> Cow<'_, str> {
    SELF_LINK_RE.replace_all(html, "${1}")
}

/// Turn `&quot;` entities back into literal double quotes.
#[must_use]
pub fn unescape_quotes(html: &str) -> String {
    html.replace("&quot;", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repair_full_macro() {
        assert_eq!(
            repair_macro_escapes("<p>&lt;%name%&gt;</p>"),
            "<p><%name%></p>"
        );
    }

    #[test]
    fn test_repair_opener_only() {
        assert_eq!(
            repair_macro_escapes("<p>&lt;%section(\"Intro\")%></p>"),
            "<p><%section(\"Intro\")%></p>"
        );
    }

    #[test]
    fn test_repair_leaves_unrelated_entities() {
        assert_eq!(
            repair_macro_escapes("<p>a &lt; b &amp;&amp; 50%&gt;x</p>"),
            "<p>a &lt; b &amp;&amp; 50%&gt;x</p>"
        );
    }

    #[test]
    fn test_repair_multiple_macros() {
        assert_eq!(
            repair_macro_escapes("&lt;%a%&gt; and &lt;%b%&gt;"),
            "<%a%> and <%b%>"
        );
    }

    #[test]
    fn test_repair_multi_line_haml_closer() {
        assert_eq!(
            repair_macro_escapes("<p>Intro\n&lt;%%%\n%p hi\n%%%&gt;</p>"),
            "<p>Intro\n<%%%\n%p hi\n%%%></p>"
        );
        assert_eq!(
            repair_macro_escapes("<p>Intro\n<%%%\n%p hi\n%%%&gt;</p>"),
            "<p>Intro\n<%%%\n%p hi\n%%%></p>"
        );
    }

    #[test]
    fn test_strip_self_link() {
        assert_eq!(strip_self_links(r#"<a href="">Click here</a>"#), "Click here");
    }

    #[test]
    fn test_strip_keeps_real_links() {
        let html = r#"<a href="/x">Click here</a>"#;
        assert_eq!(strip_self_links(html), html);
    }

    #[test]
    fn test_strip_multiple_self_links_non_greedy() {
        assert_eq!(
            strip_self_links(r#"<a href="">A</a> | <a href="b.html">B</a> | <a href="">C</a>"#),
            r#"A | <a href="b.html">B</a> | C"#
        );
    }

    #[test]
    fn test_unescape_quotes() {
        assert_eq!(
            unescape_quotes("<p>&quot;quoted&quot; &amp; more</p>"),
            "<p>\"quoted\" &amp; more</p>"
        );
    }
}
