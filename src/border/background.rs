//! Background color estimation
//!
//! Tallies the colors on the one-pixel outer ring of an image and picks the
//! most frequent one. Ties go to the color met first while walking the ring:
//! top and bottom rows left to right, then the left and right columns top to
//! bottom.

use image::{Rgba, RgbaImage};
use std::collections::HashMap;

use super::types::BackgroundEstimate;

/// Per-color occurrence counts for one estimation
#[derive(Debug, Default)]
struct Histogram {
    /// color -> (count, first-seen order)
    entries: HashMap<Rgba<u8>, (usize, usize)>,
    visited: usize,
}

impl Histogram {
    fn push(&mut self, color: Rgba<u8>) {
        let order = self.entries.len();
        self.entries.entry(color).or_insert((0, order)).0 += 1;
        self.visited += 1;
    }

    /// Color with the highest count, earliest seen on ties
    fn most_frequent(&self) -> Option<(Rgba<u8>, usize)> {
        self.entries
            .iter()
            .max_by(|(_, (count_a, order_a)), (_, (count_b, order_b))| {
                count_a.cmp(count_b).then(order_b.cmp(order_a))
            })
            .map(|(color, (count, _))| (*color, *count))
    }
}

/// Background color estimator
pub struct BackgroundEstimator;

impl BackgroundEstimator {
    /// Number of pixels on the outer ring of a `width x height` image
    ///
    /// Images one pixel thin are all ring, each pixel counted once.
    pub fn ring_length(width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        if w == 0 || h == 0 {
            0
        } else if w == 1 || h == 1 {
            w * h
        } else {
            2 * w + 2 * h - 4
        }
    }

    /// Estimate the background color from the image border
    ///
    /// Returns `None` for an empty image.
    pub fn estimate(image: &RgbaImage) -> Option<BackgroundEstimate> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let mut histogram = Histogram::default();
        let last_y = height - 1;
        let last_x = width - 1;

        for x in 0..width {
            histogram.push(*image.get_pixel(x, 0));
            if last_y > 0 {
                histogram.push(*image.get_pixel(x, last_y));
            }
        }
        for y in 1..last_y {
            histogram.push(*image.get_pixel(0, y));
            if last_x > 0 {
                histogram.push(*image.get_pixel(last_x, y));
            }
        }

        debug_assert_eq!(histogram.visited, Self::ring_length(width, height));

        let (color, count) = histogram.most_frequent()?;
        let estimate = BackgroundEstimate {
            color,
            count,
            ring_length: histogram.visited,
        };
        tracing::debug!(
            color = ?estimate.color.0,
            count = estimate.count,
            ring_length = estimate.ring_length,
            distinct = histogram.entries.len(),
            "background estimated"
        );
        Some(estimate)
    }
}
