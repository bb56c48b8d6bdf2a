//! Embedded Haml regions.
//!
//! A region starts with [`HAML_OPEN`] at the beginning of a line and ends at
//! the nearest following [`HAML_CLOSE`], which may sit anywhere, including on
//! a later line. Regions never overlap. An opener with no closer after it is
//! left as ordinary text.

use std::ops::Range;

/// Marker opening an embedded Haml region.
pub const HAML_OPEN: &str = "<%%%";

/// Marker closing an embedded Haml region.
pub const HAML_CLOSE: &str = "%%%>";

/// Location of one embedded Haml region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HamlRegion {
    /// Byte range of the whole region, markers included.
    pub outer: Range<usize>,
    /// Byte range of the Haml source between the markers.
    pub inner: Range<usize>,
}

/// Find every embedded Haml region in `text`, in order.
#[must_use]
pub fn find_haml_regions(text: &str) -> Vec<HamlRegion> {
    let mut regions = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(HAML_OPEN) {
        let start = pos + offset;
        let at_line_start = start == 0 || text.as_bytes()[start - 1] == b'\n';
        if !at_line_start {
            pos = start + 1;
            continue;
        }

        let content_start = start + HAML_OPEN.len();
        let Some(close_offset) = text[content_start..].find(HAML_CLOSE) else {
            break;
        };
        let content_end = content_start + close_offset;
        let end = content_end + HAML_CLOSE.len();

        regions.push(HamlRegion {
            outer: start..end,
            inner: content_start..content_end,
        });
        pos = end;
    }

    regions
}

/// Replace each embedded Haml region with `render(source)`.
///
/// Stops at the first render error; `text` itself is never modified.
pub fn replace_haml_regions<E>(
    text: &str,
    mut render: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let regions = find_haml_regions(text);
    if regions.is_empty() {
        return Ok(text.to_owned());
    }

    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for region in regions {
        output.push_str(&text[last..region.outer.start]);
        output.push_str(&render(&text[region.inner])?);
        last = region.outer.end;
    }
    output.push_str(&text[last..]);

    Ok(output)
}
