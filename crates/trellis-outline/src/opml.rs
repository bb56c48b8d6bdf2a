//! OPML outline documents.
//!
//! ```xml
//! <opml version="1.0">
//!   <head><title>Site</title></head>
//!   <body>
//!     <outline text="Guide" url="/guide.html">
//!       <outline text="Setup"/>
//!     </outline>
//!   </body>
//! </opml>
//! ```
//!
//! Each `<outline>` attaches to the nearest enclosing `<outline>`, or to the
//! root when it has none. Everything inside `<head>` is skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::tree::{NodeId, OutlineNode, OutlineTree, OutlineTreeBuilder};

/// An element still waiting for its end tag.
struct OpenElement {
    name: String,
    node: Option<NodeId>,
}

/// Parse an OPML document.
///
/// # Errors
///
/// Returns [`ParseError`] if the XML is malformed, an `<outline>` has no
/// `text` attribute, or the document is empty.
pub fn parse_opml(input: &str) -> Result<OutlineTree, ParseError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut builder = OutlineTreeBuilder::new();
    let mut open: Vec<OpenElement> = Vec::new();
    let mut head_depth = 0usize;
    let mut seen_element = false;

    loop {
        let event = reader.read_event()?;
        let position = reader.buffer_position();
        match event {
            Event::Start(e) => {
                seen_element = true;
                let name = element_name(&e);
                let node = if head_depth > 0 || name == "head" {
                    head_depth += 1;
                    None
                } else if name == "outline" {
                    let parent = enclosing_outline(&open).unwrap_or(builder.root());
                    Some(builder.add_node(parent, outline_node(&e, position)?))
                } else {
                    None
                };
                open.push(OpenElement { name, node });
            }
            Event::Empty(e) => {
                seen_element = true;
                if head_depth == 0 && e.name().as_ref() == b"outline" {
                    let parent = enclosing_outline(&open).unwrap_or(builder.root());
                    builder.add_node(parent, outline_node(&e, position)?);
                }
            }
            Event::End(_) => {
                open.pop();
                head_depth = head_depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.pop() {
        return Err(ParseError::Unclosed {
            element: element.name,
        });
    }
    if !seen_element {
        return Err(ParseError::Empty);
    }

    Ok(builder.build())
}

fn enclosing_outline(open: &[OpenElement]) -> Option<NodeId> {
    open.iter().rev().find_map(|element| element.node)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn outline_node(e: &BytesStart<'_>, position: u64) -> Result<OutlineNode, ParseError> {
    let mut node = OutlineNode::default();
    let mut has_text = false;

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        match attr.key.as_ref() {
            b"text" => {
                node.name = value;
                has_text = true;
            }
            b"url" | b"path" => node.path = Some(value),
            b"title" => node.title = Some(value),
            _ => {}
        }
    }

    if !has_text {
        return Err(ParseError::MissingText { position });
    }
    Ok(node)
}
