//! Geometry and content types shared by the comparison pipeline.
//!
//! Page-space values are points with a top-left origin; pixel-space values
//! index into rendered bitmaps.

mod block;
mod geometry;

pub use block::{BlockKind, TextBlock};
pub use geometry::{DiffRegion, PageRect, TextRange};
