//! Border Detection & Cropping module
//!
//! Finds a single-color border around an image and computes the box that
//! removes it.
//!
//! # Algorithm
//!
//! 1. Build a color histogram of the one-pixel outer ring
//! 2. Accept the most frequent color as background only if it covers a
//!    strict majority of the ring
//! 3. Strip every leading/trailing row and column made only of that color
//! 4. Grow the remaining box by the margin, clamped to the image
//!
//! # Example
//!
//! ```rust,no_run
//! use bordercrop::border::detect_crop_box;
//!
//! let rgba = image::open("scan.png").unwrap().to_rgba8();
//! let (background, crop_box) = detect_crop_box(&rgba, 2).unwrap();
//! println!("background {:?}, crop {}", background.color, crop_box);
//! ```

mod background;
mod bounds;
mod types;

pub use background::BackgroundEstimator;
pub use bounds::{crop_image, CropBoxCalculator};
pub use types::{BackgroundEstimate, BorderError, CropBox, Result, CONFIDENCE_THRESHOLD};

use image::RgbaImage;

/// Estimate the background and compute the crop box in one step
///
/// Fails with [`BorderError::LowConfidenceBackground`] when no color covers
/// more than half of the ring, and with [`BorderError::InvalidCropBox`] when
/// nothing but background remains.
pub fn detect_crop_box(image: &RgbaImage, margin: u32) -> Result<(BackgroundEstimate, CropBox)> {
    let estimate = BackgroundEstimator::estimate(image)
        .ok_or_else(|| BorderError::InvalidImage("image has no pixels".to_string()))?;

    if !estimate.is_confident() {
        return Err(BorderError::LowConfidenceBackground {
            coverage: estimate.coverage(),
        });
    }

    let crop_box = CropBoxCalculator::calculate(image, estimate.color, margin)?;
    Ok((estimate, crop_box))
}
