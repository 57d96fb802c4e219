//! Horizontal text extent of a page.

use crate::backend::PageSource;
use crate::error::Result;
use crate::model::{TextBlock, TextRange};

/// Horizontal extent of the text blocks in `blocks`.
///
/// Non-text blocks are ignored. When no usable extent exists (no text
/// blocks, or only degenerate ones) the full page width is returned.
pub fn text_range(blocks: &[TextBlock], page_width: f32) -> TextRange {
    let (left, right) = blocks
        .iter()
        .filter(|block| block.is_text())
        .fold((f32::INFINITY, 0.0_f32), |(left, right), block| {
            (left.min(block.rect.left), right.max(block.rect.right))
        });

    if left < right {
        TextRange::new(left, right)
    } else {
        TextRange::new(0.0, page_width)
    }
}

/// Text extent of a page.
pub fn page_text_range(page: &dyn PageSource) -> Result<TextRange> {
    Ok(text_range(&page.text_blocks()?, page.width()))
}

/// Union of both pages' text extents.
pub fn merged_text_range(before: &dyn PageSource, after: &dyn PageSource) -> Result<TextRange> {
    Ok(page_text_range(before)?.merge(&page_text_range(after)?))
}
