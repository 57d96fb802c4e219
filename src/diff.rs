//! Change detection between two renders of the same page.
//!
//! The renders are compared per pixel, the absolute difference is reduced to
//! luma and thresholded into a binary mask, and the outer contours of that
//! mask are collapsed into a single bounding [`DiffRegion`]. Disjoint change
//! clusters are not separated.

use image::imageops;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};

use crate::model::DiffRegion;
use crate::options::DEFAULT_THRESHOLD;
use crate::raster;

const MASK_ON: Luma<u8> = Luma([255]);
const MASK_OFF: Luma<u8> = Luma([0]);

/// Detects the changed region between two bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffDetector {
    threshold: u8,
}

impl DiffDetector {
    /// Create a detector; pixels whose difference luma exceeds `threshold`
    /// count as changed.
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Luma cutoff in use.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Binary change mask: 255 where the renders differ beyond the threshold.
    ///
    /// `after` is resized to `before`'s dimensions when they differ.
    pub fn change_mask(&self, before: &RgbImage, after: &RgbImage) -> GrayImage {
        let resized;
        let after = if before.dimensions() == after.dimensions() {
            after
        } else {
            resized = raster::match_dimensions(before, after.clone());
            &resized
        };

        let gray = imageops::grayscale(&abs_diff(before, after));
        GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            if gray.get_pixel(x, y)[0] > self.threshold {
                MASK_ON
            } else {
                MASK_OFF
            }
        })
    }

    /// Bounding box of every outer contour in the change mask, or `None`
    /// when the renders match.
    pub fn detect(&self, before: &RgbImage, after: &RgbImage) -> Option<DiffRegion> {
        let mask = self.change_mask(before, after);
        let contours: Vec<Contour<u32>> = find_contours(&mask);

        contours
            .iter()
            .filter(|contour| contour.border_type == BorderType::Outer)
            .flat_map(|contour| contour.points.iter())
            .fold(None, |region: Option<DiffRegion>, point| {
                Some(match region {
                    Some(mut region) => {
                        region.include(point.x, point.y);
                        region
                    }
                    None => DiffRegion::point(point.x, point.y),
                })
            })
    }
}

impl Default for DiffDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

/// Per-channel absolute difference of two equally sized images.
pub fn abs_diff(a: &RgbImage, b: &RgbImage) -> RgbImage {
    RgbImage::from_fn(a.width(), a.height(), |x, y| {
        let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
        Rgb([
            pa[0].abs_diff(pb[0]),
            pa[1].abs_diff(pb[1]),
            pa[2].abs_diff(pb[2]),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn paint(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Rgb(color));
            }
        }
    }

    #[test]
    fn test_identical_images_have_no_region() {
        let img = white(50, 40);
        assert_eq!(DiffDetector::default().detect(&img, &img.clone()), None);
    }

    #[test]
    fn test_single_block_region() {
        let before = white(60, 80);
        let mut after = before.clone();
        paint(&mut after, 10, 20, 30, 35, [255, 0, 0]);

        let region = DiffDetector::default().detect(&before, &after).unwrap();
        assert_eq!(region, DiffRegion::new(10, 20, 29, 34));
    }

    #[test]
    fn test_disjoint_clusters_collapse() {
        let before = white(100, 100);
        let mut after = before.clone();
        paint(&mut after, 5, 5, 10, 10, [0, 0, 0]);
        paint(&mut after, 70, 60, 80, 90, [0, 0, 255]);

        let region = DiffDetector::default().detect(&before, &after).unwrap();
        assert_eq!(region, DiffRegion::new(5, 5, 79, 89));
    }

    #[test]
    fn test_threshold() {
        assert_eq!(DiffDetector::default().threshold(), 30);
        assert_eq!(DiffDetector::new(5).threshold(), 5);
    }

    #[test]
    fn test_change_below_threshold_is_ignored() {
        let before = white(20, 20);
        let mut after = before.clone();
        paint(&mut after, 2, 2, 8, 8, [240, 240, 240]);

        assert_eq!(DiffDetector::new(30).detect(&before, &after), None);
        assert!(DiffDetector::new(10).detect(&before, &after).is_some());
    }

    #[test]
    fn test_size_mismatch_is_resized() {
        let before = white(40, 40);
        let after = white(20, 20);
        let mask = DiffDetector::default().change_mask(&before, &after);
        assert_eq!(mask.dimensions(), (40, 40));
        assert_eq!(DiffDetector::default().detect(&before, &after), None);
    }

    #[test]
    fn test_abs_diff() {
        let a = RgbImage::from_pixel(1, 1, Rgb([10, 200, 30]));
        let b = RgbImage::from_pixel(1, 1, Rgb([50, 100, 30]));
        assert_eq!(*abs_diff(&a, &b).get_pixel(0, 0), Rgb([40, 100, 0]));
    }
}
