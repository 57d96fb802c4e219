//! Positioned content blocks reported by a page.

use super::PageRect;
use serde::{Deserialize, Serialize};

/// Kind of content a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Text run or line
    #[default]
    Text,
    /// Raster or vector image
    Image,
}

/// A positioned block on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounds in page coordinates (origin top-left)
    pub rect: PageRect,

    /// Block type tag
    pub kind: BlockKind,
}

impl TextBlock {
    /// Create a text block.
    pub fn text(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            rect: PageRect::new(left, top, right, bottom),
            kind: BlockKind::Text,
        }
    }

    /// Create an image block.
    pub fn image(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            rect: PageRect::new(left, top, right, bottom),
            kind: BlockKind::Image,
        }
    }

    /// Check if this block holds text.
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }
}
