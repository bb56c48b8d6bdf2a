//! Outline parse errors.

use quick_xml::events::attributes::AttrError;

/// Error returned when an outline document cannot be parsed.
///
/// Fatal to navigation rendering for the whole site, since every page shares
/// the same tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The OPML document is not well-formed XML.
    #[error("Malformed outline XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element carries a malformed attribute.
    #[error("Malformed outline attribute: {0}")]
    XmlAttr(#[from] AttrError),

    /// An `<outline>` element has no `text` attribute.
    #[error("Outline element at byte {position} has no text attribute")]
    MissingText {
        /// Byte offset just past the element.
        position: u64,
    },

    /// The document ended inside an element.
    #[error("Unclosed <{element}> element")]
    Unclosed {
        /// Name of the innermost open element.
        element: String,
    },

    /// A line dedents to a depth that was never opened.
    #[error("Line {line}: indentation does not match any enclosing entry")]
    Indentation {
        /// 1-based line number.
        line: usize,
    },

    /// The document holds no outline at all.
    #[error("Outline document is empty")]
    Empty,
}
