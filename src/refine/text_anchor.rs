use image::RgbImage;

use super::{CropBounds, RefineContext, Refiner};
use crate::error::Result;
use crate::model::{PageRect, TextBlock};
use crate::options::TopFallback;
use crate::raster;

/// Refinement anchored to the text layout of full-page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAnchoredRefiner {
    white_level: u8,
    top_fallback: TopFallback,
}

impl TextAnchoredRefiner {
    /// Create a refiner; `white_level` drives the bottom trim and
    /// `top_fallback` applies when no text ends above a change.
    pub fn new(white_level: u8, top_fallback: TopFallback) -> Self {
        Self {
            white_level,
            top_fallback,
        }
    }

    /// Bottom edge of the nearest text block ending strictly above
    /// `diff_top`, or the configured fallback edge.
    pub fn anchor_top(&self, blocks: &[TextBlock], diff_top: f32, page_height: f32) -> f32 {
        blocks
            .iter()
            .filter(|block| block.is_text())
            .map(|block| block.rect.bottom)
            .filter(|&bottom| bottom < diff_top)
            .fold(None, |best: Option<f32>, bottom| {
                Some(best.map_or(bottom, |b| b.max(bottom)))
            })
            .unwrap_or(match self.top_fallback {
                TopFallback::PageTop => 0.0,
                TopFallback::PageBottom => page_height,
            })
    }
}

impl Refiner for TextAnchoredRefiner {
    fn clip_to_text(&self) -> bool {
        false
    }

    fn refine(&self, ctx: &RefineContext<'_>) -> Result<CropBounds> {
        let page = ctx.page;
        let px_to_pt = page.height() / ctx.target.height() as f32;
        let diff_top = ctx.region.y_min as f32 * px_to_pt;
        let diff_bottom = (ctx.region.y_max + 1) as f32 * px_to_pt;

        let top = self.anchor_top(&page.text_blocks()?, diff_top, page.height());
        let bounds = page.bounds();
        let clip = PageRect::new(ctx.text_range.left, top, ctx.text_range.right, diff_bottom)
            .normalized()
            .intersect(&bounds)
            .unwrap_or(bounds);

        log::debug!(
            "change spans {:.1}..{:.1}pt, anchored at {:.1}pt, clip {:?}",
            diff_top,
            diff_bottom,
            top,
            clip
        );
        Ok(CropBounds::Clip(clip))
    }

    fn extract(&self, bounds: &CropBounds, ctx: &RefineContext<'_>) -> Result<RgbImage> {
        let image = bounds.crop(ctx)?;
        Ok(raster::trim_bottom_whitespace(image, self.white_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{PageSource, SyntheticPage};
    use crate::diff::DiffDetector;
    use crate::locate;

    const RED: [u8; 3] = [220, 0, 0];

    fn lines() -> SyntheticPage {
        SyntheticPage::letter()
            .with_text_line(PageRect::new(72.0, 72.0, 540.0, 90.0))
            .with_text_line(PageRect::new(72.0, 100.0, 540.0, 118.0))
    }

    fn crop_for(
        before: &SyntheticPage,
        after: &SyntheticPage,
        refiner: &TextAnchoredRefiner,
    ) -> (CropBounds, RgbImage) {
        let dpi = 72.0;
        let img1 = before.render(dpi, None).unwrap();
        let img2 = after.render(dpi, None).unwrap();
        let region = DiffDetector::default().detect(&img1, &img2).unwrap();
        let ctx = RefineContext {
            region,
            page: after,
            text_range: locate::merged_text_range(before, after).unwrap(),
            reference: &img1,
            target: &img2,
            dpi,
        };
        let bounds = refiner.refine(&ctx).unwrap();
        let crop = refiner.extract(&bounds, &ctx).unwrap();
        (bounds, crop)
    }

    #[test]
    fn test_anchor_top_picks_nearest_block_above() {
        let refiner = TextAnchoredRefiner::new(255, TopFallback::PageTop);
        let blocks = vec![
            TextBlock::text(72.0, 72.0, 540.0, 90.0),
            TextBlock::text(72.0, 100.0, 540.0, 118.0),
            TextBlock::image(72.0, 120.0, 540.0, 190.0),
            TextBlock::text(72.0, 300.0, 540.0, 318.0),
        ];
        assert_eq!(refiner.anchor_top(&blocks, 200.0, 792.0), 118.0);
    }

    #[test]
    fn test_anchor_top_fallbacks() {
        let blocks = vec![TextBlock::text(72.0, 300.0, 540.0, 318.0)];
        let top = TextAnchoredRefiner::new(255, TopFallback::PageTop);
        let bottom = TextAnchoredRefiner::new(255, TopFallback::PageBottom);
        assert_eq!(top.anchor_top(&blocks, 200.0, 792.0), 0.0);
        assert_eq!(bottom.anchor_top(&blocks, 200.0, 792.0), 792.0);
    }

    #[test]
    fn test_crop_anchors_to_text_above() {
        let before = lines();
        let after = lines().with_fill(PageRect::new(72.0, 200.0, 300.0, 220.0), RED);
        let refiner = TextAnchoredRefiner::new(255, TopFallback::PageTop);

        let (bounds, crop) = crop_for(&before, &after, &refiner);
        assert_eq!(bounds, CropBounds::Clip(PageRect::new(72.0, 118.0, 540.0, 220.0)));
        assert_eq!(crop.dimensions(), (468, 102));
    }

    #[test]
    fn test_crop_trims_removed_content() {
        // The second block only exists in the first document, so the bottom
        // of the re-rendered crop is blank and gets trimmed.
        let before = lines().with_fill(PageRect::new(72.0, 230.0, 300.0, 260.0), RED);
        let after = lines().with_fill(PageRect::new(72.0, 200.0, 300.0, 220.0), RED);
        let refiner = TextAnchoredRefiner::new(255, TopFallback::PageTop);

        let (bounds, crop) = crop_for(&before, &after, &refiner);
        assert_eq!(bounds, CropBounds::Clip(PageRect::new(72.0, 118.0, 540.0, 260.0)));
        assert_eq!(crop.dimensions(), (468, 102));
    }

    #[test]
    fn test_crop_without_text_above_uses_fallback() {
        let before = SyntheticPage::letter();
        let after = SyntheticPage::letter().with_fill(PageRect::new(100.0, 50.0, 200.0, 80.0), RED);

        let top = TextAnchoredRefiner::new(255, TopFallback::PageTop);
        let (bounds, crop) = crop_for(&before, &after, &top);
        assert_eq!(bounds, CropBounds::Clip(PageRect::new(0.0, 0.0, 612.0, 80.0)));
        assert_eq!(crop.dimensions(), (612, 80));

        let bottom = TextAnchoredRefiner::new(255, TopFallback::PageBottom);
        let (bounds, _) = crop_for(&before, &after, &bottom);
        assert_eq!(bounds, CropBounds::Clip(PageRect::new(0.0, 80.0, 612.0, 792.0)));
    }
}
