//! Leading front-matter block detection for Markdown documents.
//!
//! A front-matter block starts with a line of exactly `---` at the very
//! beginning of the document and ends at the next line of exactly `---`.
//! Everything here is lenient: a document without a well-formed block is
//! simply reported as having none.

use std::ops::Range;

const FENCE: &str = "---";

/// Location of a `---` fenced block at the start of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontBlock {
    /// Byte range of the lines between the two fences (may be empty).
    pub inner: Range<usize>,
    /// Byte offset just past the closing fence line, line break included.
    pub end: usize,
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == FENCE
}

/// Finds the leading front-matter block, if the document has one.
pub fn find_front_block(text: &str) -> Option<FrontBlock> {
    let mut lines = text.split_inclusive('\n');
    let opening = lines.next()?;
    if !is_fence(opening) || !opening.ends_with('\n') {
        return None;
    }

    let inner_start = opening.len();
    let mut offset = inner_start;
    for line in lines {
        if is_fence(line) {
            return Some(FrontBlock {
                inner: inner_start..offset,
                end: offset + line.len(),
            });
        }
        offset += line.len();
    }

    // Opening fence without a closing one is not front-matter.
    None
}

/// Returns the document with its leading front-matter block removed.
///
/// Without a leading block the whole document is returned unchanged.
pub fn strip_front_matter(text: &str) -> &str {
    match find_front_block(text) {
        Some(block) => &text[block.end..],
        None => text,
    }
}

/// Byte range scanned by line-level front-matter rewrites.
///
/// This is the fenced block when one exists, otherwise the whole document.
pub fn front_region(text: &str) -> Range<usize> {
    find_front_block(text)
        .map(|block| block.inner)
        .unwrap_or(0..text.len())
}

/// Rewrites the front region with `edit`, leaving the rest of the document
/// untouched. When `edit` returns `None` the text is returned as-is.
pub fn edit_front_region(text: &str, edit: impl FnOnce(&str) -> Option<String>) -> String {
    let region = front_region(text);
    match edit(&text[region.clone()]) {
        Some(replacement) => {
            let mut out = String::with_capacity(text.len() + replacement.len());
            out.push_str(&text[..region.start]);
            out.push_str(&replacement);
            out.push_str(&text[region.end..]);
            out
        }
        None => text.to_string(),
    }
}
