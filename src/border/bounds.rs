//! Crop box calculation
//!
//! Strips scanlines made only of the background color from each side of the
//! image, then grows the remaining box by the requested margin.

use image::{DynamicImage, Rgba, RgbaImage};

use super::types::{BorderError, CropBox, Result};

/// Crop box calculator
pub struct CropBoxCalculator;

impl CropBoxCalculator {
    /// Compute the tight content box, without margin
    ///
    /// An image made only of `background` yields an inverted box
    /// (`left = width`, `right = 0`, and likewise vertically).
    pub fn content_box(image: &RgbaImage, background: Rgba<u8>) -> CropBox {
        let (width, height) = image.dimensions();

        let ((left, right), (top, bottom)) = rayon::join(
            || {
                rayon::join(
                    || Self::scan_columns(image, background, 0..width).unwrap_or(width),
                    || {
                        Self::scan_columns(image, background, (0..width).rev())
                            .map_or(0, |x| x + 1)
                    },
                )
            },
            || {
                rayon::join(
                    || Self::scan_rows(image, background, 0..height).unwrap_or(height),
                    || {
                        Self::scan_rows(image, background, (0..height).rev())
                            .map_or(0, |y| y + 1)
                    },
                )
            },
        );

        CropBox::new(left, top, right, bottom)
    }

    /// Compute the final crop box with `margin` pixels of background kept
    pub fn calculate(image: &RgbaImage, background: Rgba<u8>, margin: u32) -> Result<CropBox> {
        let (width, height) = image.dimensions();
        let content = Self::content_box(image, background);
        if !content.is_valid_for(width, height) {
            return Err(BorderError::InvalidCropBox(content));
        }
        let crop_box = content.expand(margin, width, height);

        tracing::debug!(%content, %crop_box, margin, "crop box computed");

        if !crop_box.is_valid_for(width, height) {
            return Err(BorderError::InvalidCropBox(crop_box));
        }
        Ok(crop_box)
    }

    /// First column in `columns` holding a non-background pixel
    fn scan_columns(
        image: &RgbaImage,
        background: Rgba<u8>,
        mut columns: impl Iterator<Item = u32>,
    ) -> Option<u32> {
        let height = image.height();
        columns.find(|&x| (0..height).any(|y| *image.get_pixel(x, y) != background))
    }

    /// First row in `rows` holding a non-background pixel
    fn scan_rows(
        image: &RgbaImage,
        background: Rgba<u8>,
        mut rows: impl Iterator<Item = u32>,
    ) -> Option<u32> {
        let width = image.width();
        rows.find(|&y| (0..width).any(|x| *image.get_pixel(x, y) != background))
    }
}

/// Cut `crop_box` out of the original image, keeping its color type
pub fn crop_image(original: &DynamicImage, crop_box: &CropBox) -> DynamicImage {
    original.crop_imm(
        crop_box.left,
        crop_box.top,
        crop_box.width(),
        crop_box.height(),
    )
}
