//! Rasterization geometry and bitmap helpers.
//!
//! Backends render whole pages through [`page_pixel_size`] and cut clip
//! rectangles out with [`crop_to_clip`], so every backend maps page space to
//! pixel space identically.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::model::PageRect;

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Pixels per page point at the given resolution.
pub fn scale_for_dpi(dpi: f32) -> f32 {
    dpi / POINTS_PER_INCH
}

/// Pixel size of a full-page render.
pub fn page_pixel_size(width: f32, height: f32, dpi: f32) -> (u32, u32) {
    let scale = scale_for_dpi(dpi);
    let to_px = |v: f32| ((v * scale).round() as u32).max(1);
    (to_px(width), to_px(height))
}

/// Pixel bounds `(x, y, width, height)` of a clip rectangle inside an image
/// of `image_width` x `image_height` rendered at `scale`.
///
/// Edges round outward and are clamped to the image; the result is never
/// narrower or shorter than one pixel.
pub fn clip_to_pixels(
    clip: &PageRect,
    scale: f32,
    image_width: u32,
    image_height: u32,
) -> (u32, u32, u32, u32) {
    let clip = clip.normalized();
    let clamp = |v: f32, max: u32| (v.max(0.0) as u32).min(max);

    let x0 = clamp((clip.left * scale).floor(), image_width.saturating_sub(1));
    let y0 = clamp((clip.top * scale).floor(), image_height.saturating_sub(1));
    let x1 = clamp((clip.right * scale).ceil(), image_width).max(x0 + 1);
    let y1 = clamp((clip.bottom * scale).ceil(), image_height).max(y0 + 1);

    (x0, y0, x1 - x0, y1 - y0)
}

/// Cut a page-space clip rectangle out of a full-page render.
pub fn crop_to_clip(image: &RgbImage, clip: &PageRect, scale: f32) -> RgbImage {
    let (x, y, width, height) = clip_to_pixels(clip, scale, image.width(), image.height());
    imageops::crop_imm(image, x, y, width, height).to_image()
}

/// Resize `image` to the reference's dimensions when they differ.
pub fn match_dimensions(reference: &RgbImage, image: RgbImage) -> RgbImage {
    if reference.dimensions() == image.dimensions() {
        return image;
    }
    log::warn!(
        "render size mismatch: {:?} vs {:?}, resizing",
        reference.dimensions(),
        image.dimensions()
    );
    imageops::resize(
        &image,
        reference.width(),
        reference.height(),
        FilterType::Triangle,
    )
}

/// Raw channel bytes of row `y`.
pub fn row(image: &RgbImage, y: u32) -> &[u8] {
    let stride = image.width() as usize * 3;
    let start = y as usize * stride;
    &image.as_raw()[start..start + stride]
}

/// Whether every channel of row `y` is at or above `white_level`.
pub fn is_blank_row(image: &RgbImage, y: u32, white_level: u8) -> bool {
    row(image, y).iter().all(|&c| c >= white_level)
}

/// Whether row `y` is byte-identical in both images.
///
/// Both images must share the same width.
pub fn rows_equal(a: &RgbImage, b: &RgbImage, y: u32) -> bool {
    row(a, y) == row(b, y)
}

/// Rows `[top, bottom)` of an image at full width.
pub fn crop_rows(image: &RgbImage, top: u32, bottom: u32) -> RgbImage {
    let bottom = bottom.min(image.height());
    let top = top.min(bottom);
    imageops::crop_imm(image, 0, top, image.width(), bottom - top).to_image()
}

/// Drop trailing blank rows.
///
/// Scans from the bottom for the last row with content and keeps everything
/// above and including it. A fully blank image is returned unchanged.
pub fn trim_bottom_whitespace(image: RgbImage, white_level: u8) -> RgbImage {
    let last_content = (0..image.height())
        .rev()
        .find(|&y| !is_blank_row(&image, y, white_level));

    match last_content {
        Some(y) if y + 1 < image.height() => crop_rows(&image, 0, y + 1),
        _ => image,
    }
}
