//! In-process Markdown conversion.

use pulldown_cmark::{Parser, html};

use crate::converter::{Converter, ConverterKind};
use crate::error::ConversionError;

/// Markdown to HTML converter backed by `pulldown-cmark`.
///
/// Uses plain CommonMark without extensions, the closest match to
/// Markdown.pl. Like Markdown.pl it escapes `<%` in text, so macro
/// openers need repairing afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkConverter;

impl Converter for CmarkConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::Markdown
    }

    fn convert(&self, input: &str) -> Result<String, ConversionError> {
        let mut output = String::with_capacity(input.len() * 3 / 2);
        html::push_html(&mut output, Parser::new(input));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraph_and_emphasis() {
        let html = CmarkConverter.convert("Some *emphasis* here.").unwrap();
        assert_eq!(html, "<p>Some <em>emphasis</em> here.</p>\n");
    }

    #[test]
    fn test_macro_opener_is_escaped() {
        let html = CmarkConverter.convert("<%breadcrumbs%>").unwrap();
        assert!(html.contains("&lt;%breadcrumbs%"), "{html}");
    }

    #[test]
    fn test_inline_html_passes_through() {
        let html = CmarkConverter.convert("<div class='x'>\nraw\n</div>\n").unwrap();
        assert_eq!(html, "<div class='x'>\nraw\n</div>\n");
    }
}
