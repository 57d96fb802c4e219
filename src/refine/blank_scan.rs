use image::RgbImage;

use super::{CropBounds, RefineContext, Refiner};
use crate::error::Result;
use crate::raster;

/// Pixel-only refinement over renders clipped to the text range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankScanRefiner {
    white_level: u8,
}

impl BlankScanRefiner {
    /// Create a refiner treating channels `>= white_level` as blank.
    pub fn new(white_level: u8) -> Self {
        Self { white_level }
    }

    /// First row of the crop: walk upward from the change through blank
    /// rows of `after`, stopping at the first row with content.
    pub fn upper_bound(&self, after: &RgbImage, y_min: u32) -> u32 {
        (0..y_min)
            .rev()
            .take_while(|&y| raster::is_blank_row(after, y, self.white_level))
            .last()
            .unwrap_or(y_min)
    }

    /// One past the last row of the crop: the first row at or below the
    /// change where both renders are identical, or the image height.
    pub fn lower_bound(&self, before: &RgbImage, after: &RgbImage, y_max: u32) -> u32 {
        (y_max..after.height())
            .find(|&y| raster::rows_equal(before, after, y))
            .unwrap_or(after.height())
    }
}

impl Refiner for BlankScanRefiner {
    fn clip_to_text(&self) -> bool {
        true
    }

    fn refine(&self, ctx: &RefineContext<'_>) -> Result<CropBounds> {
        let top = self.upper_bound(ctx.target, ctx.region.y_min);
        let bottom = self.lower_bound(ctx.reference, ctx.target, ctx.region.y_max);
        Ok(CropBounds::Rows { top, bottom })
    }
}
