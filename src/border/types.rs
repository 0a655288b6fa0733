//! Border module core types
//!
//! Contains the crop box, the background estimate and the error type
//! shared by the detection stages.

use image::Rgba;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Fraction of the ring a background candidate must strictly exceed
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

// ============================================================
// Error Types
// ============================================================

/// Border detection and cropping error types
#[derive(Debug, Error)]
pub enum BorderError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error(
        "The background color couldn't be detected reliably ({:.1}% of the border ring)",
        .coverage * 100.0
    )]
    LowConfidenceBackground { coverage: f64 },

    #[error("Invalid crop box dimensions: {0}")]
    InvalidCropBox(CropBox),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BorderError>;

// ============================================================
// Data Structures
// ============================================================

/// Half-open rectangle `[left, right) x [top, bottom)` in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    /// Create a crop box from its four edges
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box covering a whole `width x height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width of the box, zero when inverted
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height of the box, zero when inverted
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Check the box is non-empty and lies inside a `width x height` image
    pub fn is_valid_for(&self, width: u32, height: u32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.right <= width
            && self.bottom <= height
    }

    /// Grow the box by `margin` on every side, clamped to the image
    #[must_use]
    pub fn expand(&self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(margin),
            top: self.top.saturating_sub(margin),
            right: self.right.saturating_add(margin).min(width),
            bottom: self.bottom.saturating_add(margin).min(height),
        }
    }
}

impl fmt::Display for CropBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Most probable background color of an image border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundEstimate {
    /// Winning color
    pub color: Rgba<u8>,
    /// Ring pixels matching `color`
    pub count: usize,
    /// Ring pixels visited
    pub ring_length: usize,
}

impl BackgroundEstimate {
    /// Fraction of the ring covered by the background color (0.0-1.0)
    pub fn coverage(&self) -> f64 {
        if self.ring_length == 0 {
            return 0.0;
        }
        self.count as f64 / self.ring_length as f64
    }

    /// True when the color covers a strict majority of the ring
    pub fn is_confident(&self) -> bool {
        self.coverage() > CONFIDENCE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_box_dimensions() {
        let b = CropBox::new(1, 2, 9, 7);
        assert_eq!(b.width(), 8);
        assert_eq!(b.height(), 5);
        assert!(b.is_valid_for(10, 10));
        assert!(!b.is_valid_for(8, 10));
    }

    #[test]
    fn test_inverted_box_is_invalid() {
        let b = CropBox::new(10, 10, 0, 0);
        assert_eq!(b.width(), 0);
        assert_eq!(b.height(), 0);
        assert!(!b.is_valid_for(10, 10));
    }

    #[test]
    fn test_expand_clamps_to_image() {
        let b = CropBox::new(2, 3, 8, 7).expand(5, 10, 9);
        assert_eq!(b, CropBox::full(10, 9));
    }

    #[test]
    fn test_expand_zero_margin() {
        let b = CropBox::new(2, 3, 8, 7);
        assert_eq!(b.expand(0, 10, 10), b);
    }

    #[test]
    fn test_expand_huge_margin_does_not_overflow() {
        let b = CropBox::new(2, 3, 8, 7).expand(u32::MAX, 10, 10);
        assert_eq!(b, CropBox::full(10, 10));
    }

    #[test]
    fn test_coverage_and_confidence() {
        let estimate = BackgroundEstimate {
            color: Rgba([255, 255, 255, 255]),
            count: 10,
            ring_length: 20,
        };
        assert_eq!(estimate.coverage(), 0.5);
        assert!(!estimate.is_confident());

        let estimate = BackgroundEstimate {
            count: 11,
            ..estimate
        };
        assert!(estimate.is_confident());
    }

    #[test]
    fn test_empty_ring_is_not_confident() {
        let estimate = BackgroundEstimate {
            color: Rgba([0, 0, 0, 0]),
            count: 0,
            ring_length: 0,
        };
        assert_eq!(estimate.coverage(), 0.0);
        assert!(!estimate.is_confident());
    }

    #[test]
    fn test_error_display_messages() {
        let err = BorderError::ImageNotFound(PathBuf::from("/test/path.png"));
        assert!(err.to_string().contains("not found"));

        let err = BorderError::LowConfidenceBackground { coverage: 0.5 };
        assert!(err.to_string().contains("50.0%"));

        let err = BorderError::InvalidCropBox(CropBox::new(10, 0, 0, 10));
        assert_eq!(
            err.to_string(),
            "Invalid crop box dimensions: (10, 0, 0, 10)"
        );

        let err = BorderError::UnsupportedFormat(PathBuf::from("out.xyz"));
        assert!(err.to_string().contains("out.xyz"));

        let _io: BorderError = std::io::Error::other("test").into();
    }
}
