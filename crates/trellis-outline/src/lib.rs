//! Site outline tree for trellis navigation.
//!
//! The outline document describes the navigational hierarchy of a site. It
//! is parsed once into an [`OutlineTree`] and shared read-only by every
//! navigation render.
//!
//! Two formats are accepted by [`parse`]:
//! - OPML (input starting with `<`), see [`parse_opml`]
//! - indented plain text, one name per line, see [`parse_indented`]
//!
//! # Example
//!
//! ```
//! let tree = trellis_outline::parse("Guide\n\tSetup\nFAQ\n").unwrap();
//!
//! let guide = tree.find_by_name("Guide").unwrap();
//! let setup = tree.find_by_name("Setup").unwrap();
//! assert!(tree.is_ancestor_of(guide, setup));
//! assert!(tree.find_by_name("toc").is_none());
//! ```

mod error;
mod opml;
mod text;
mod tree;

pub use error::ParseError;
pub use opml::parse_opml;
pub use text::parse_indented;
pub use tree::{NodeId, OutlineNode, OutlineTree, OutlineTreeBuilder};

/// Parse an outline document, detecting its format.
///
/// # Errors
///
/// Returns [`ParseError`] if the document is blank or malformed.
pub fn parse(input: &str) -> Result<OutlineTree, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if trimmed.starts_with('<') {
        parse_opml(input)
    } else {
        parse_indented(input)
    }
}
