//! Turning a detected change region into a tight crop.
//!
//! Two interchangeable strategies implement [`Refiner`]:
//!
//! - [`BlankScanRefiner`] works purely on pixels of renders clipped to the
//!   text range: it grows upward through blank rows above the change and
//!   stops downward at the first row where both renders agree again.
//! - [`TextAnchoredRefiner`] works on full-page renders and anchors the top
//!   of the crop to the nearest text block ending above the change, then
//!   re-renders that rectangle and trims trailing blank rows.
//!
//! The blank-scan upward walk stops at the *first* non-blank row it meets,
//! whereas the text-anchored trim searches for the *last* row with content.

mod blank_scan;
mod text_anchor;

pub use blank_scan::BlankScanRefiner;
pub use text_anchor::TextAnchoredRefiner;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::backend::PageSource;
use crate::error::Result;
use crate::model::{DiffRegion, PageRect, TextRange};
use crate::raster;

/// Everything a refiner may consult for one page pair.
pub struct RefineContext<'a> {
    /// Changed region in pixel space of the compared bitmaps
    pub region: DiffRegion,

    /// Page the crop is cut from
    pub page: &'a dyn PageSource,

    /// Merged text range of both pages
    pub text_range: TextRange,

    /// Render of the page the crop is compared against
    pub reference: &'a RgbImage,

    /// Render of `page`, resized to match `reference`
    pub target: &'a RgbImage,

    /// Resolution both renders were made at
    pub dpi: f32,
}

/// Where the crop lies, as decided by a refiner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CropBounds {
    /// Rows `[top, bottom)` of the compared `target` bitmap, full width
    Rows {
        /// First row kept
        top: u32,
        /// One past the last row kept
        bottom: u32,
    },

    /// A page-space rectangle to re-render
    Clip(PageRect),
}

impl CropBounds {
    /// Cut the bounds out of the context: rows are sliced from the compared
    /// target bitmap, clips are re-rendered from the page.
    pub fn crop(&self, ctx: &RefineContext<'_>) -> Result<RgbImage> {
        Ok(match *self {
            CropBounds::Rows { top, bottom } => raster::crop_rows(ctx.target, top, bottom),
            CropBounds::Clip(rect) => ctx.page.render(ctx.dpi, Some(&rect))?,
        })
    }
}

/// A region refinement strategy.
pub trait Refiner {
    /// Whether pages should be rendered clipped to the merged text range
    /// before they are compared.
    fn clip_to_text(&self) -> bool;

    /// Decide the crop bounds for a detected change.
    fn refine(&self, ctx: &RefineContext<'_>) -> Result<CropBounds>;

    /// Produce the crop bitmap for bounds returned by [`Refiner::refine`].
    fn extract(&self, bounds: &CropBounds, ctx: &RefineContext<'_>) -> Result<RgbImage> {
        bounds.crop(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{paint_rows, white};
    use super::*;
    use crate::backend::SyntheticPage;

    #[test]
    fn test_crop_bounds_rows_slice_target() {
        let reference = white(10, 60);
        let mut target = reference.clone();
        paint_rows(&mut target, 20, 30, [0, 0, 0]);
        let page = SyntheticPage::new(10.0, 60.0);
        let ctx = RefineContext {
            region: DiffRegion::new(0, 20, 9, 29),
            page: &page,
            text_range: TextRange::new(0.0, 10.0),
            reference: &reference,
            target: &target,
            dpi: 72.0,
        };

        let crop = CropBounds::Rows { top: 15, bottom: 30 }.crop(&ctx).unwrap();
        assert_eq!(crop.dimensions(), (10, 15));
        assert_eq!(crop.get_pixel(0, 5).0, [0, 0, 0]);
        assert_eq!(crop.get_pixel(0, 4).0, [255, 255, 255]);
    }

    #[test]
    fn test_crop_bounds_clip_re_renders_page() {
        let bitmap = white(100, 100);
        let page = SyntheticPage::new(100.0, 100.0)
            .with_fill(PageRect::new(0.0, 50.0, 100.0, 60.0), [0, 0, 200]);
        let ctx = RefineContext {
            region: DiffRegion::new(0, 50, 99, 59),
            page: &page,
            text_range: TextRange::new(0.0, 100.0),
            reference: &bitmap,
            target: &bitmap,
            dpi: 144.0,
        };

        // Rendered from the page at the context dpi, not sliced from `target`.
        let crop = CropBounds::Clip(PageRect::new(10.0, 40.0, 60.0, 60.0))
            .crop(&ctx)
            .unwrap();
        assert_eq!(crop.dimensions(), (100, 40));
        assert_eq!(crop.get_pixel(0, 39).0, [0, 0, 200]);
    }
}
