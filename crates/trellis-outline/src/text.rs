//! Indented plain-text outlines.
//!
//! One display name per line; a line indented deeper than the entry above
//! it is that entry's child. Tabs and spaces each count as one column.
//! Blank lines are skipped.

use crate::error::ParseError;
use crate::tree::{NodeId, OutlineNode, OutlineTree, OutlineTreeBuilder};

/// Parse an indented outline.
///
/// # Errors
///
/// Returns [`ParseError::Indentation`] when a line dedents to a column no
/// enclosing entry starts at, and [`ParseError::Empty`] for blank input.
pub fn parse_indented(input: &str) -> Result<OutlineTree, ParseError> {
    let mut builder = OutlineTreeBuilder::new();
    // Open entries as (indent, node), innermost last.
    let mut open: Vec<(usize, NodeId)> = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();

        let mut dedented = false;
        while open.last().is_some_and(|&(open_indent, _)| open_indent > indent) {
            open.pop();
            dedented = true;
        }
        match open.last() {
            Some(&(open_indent, _)) if open_indent == indent => {
                open.pop();
            }
            _ if dedented => return Err(ParseError::Indentation { line: index + 1 }),
            _ => {}
        }

        let parent = open.last().map_or(builder.root(), |&(_, id)| id);
        let id = builder.add_node(parent, OutlineNode::named(name));
        open.push((indent, id));
    }

    let tree = builder.build();
    if tree.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(tree)
}
