//! `<%name%>` macro expansion.

use std::sync::LazyLock;

use regex::Regex;

/// `<%name%>` or `<%name("argument")%>`. The argument's quotes may have been
/// escaped to `&quot;` by a Markdown converter.
static MACRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<%\s*(\w+)\s*(?:\(\s*(?:"([^"]*)"|&quot;(.*?)&quot;)\s*\)\s*)?%>"#).unwrap()
});

/// A macro call found in page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroCall<'a> {
    /// Macro name.
    pub name: &'a str,
    /// Quoted argument, if any.
    pub argument: Option<&'a str>,
}

/// Replace every macro call in `text` with `expand(call)`.
///
/// `expand` returns `None` for calls it does not handle; those are left
/// verbatim. Inserted text is not scanned again.
pub fn expand_macros<E>(
    text: &str,
    mut expand: impl FnMut(MacroCall<'_>) -> Result<Option<String>, E>,
) -> Result<String, E> {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for caps in MACRO_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let call = MacroCall {
            name: caps.get(1).map_or("", |m| m.as_str()),
            argument: caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()),
        };

        output.push_str(&text[last..whole.start()]);
        match expand(call)? {
            Some(replacement) => output.push_str(&replacement),
            None => output.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    output.push_str(&text[last..]);

    Ok(output)
}
