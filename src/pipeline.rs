//! Crop pipeline
//!
//! Runs the stages in order: load, analyze, crop, show, save. Nothing is
//! written unless every stage before the save succeeds.

use image::Rgba;
use std::path::{Path, PathBuf};

use crate::border::{self, crop_image, CropBox, Result};
use crate::sink;
use crate::source::SourceImage;

// ============================================================
// Options
// ============================================================

/// Options for a single crop run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOptions {
    /// Image to read
    pub input_path: PathBuf,
    /// Image to write
    pub output_path: PathBuf,
    /// Background pixels kept around the content
    pub border_size: u32,
    /// Report image details while running
    pub verbose: bool,
    /// Open the result in an image viewer before saving
    pub show: bool,
}

impl CropOptions {
    /// Create options with default flags
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            border_size: 0,
            verbose: false,
            show: false,
        }
    }

    /// Create a new options builder
    pub fn builder(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> CropOptionsBuilder {
        CropOptionsBuilder {
            options: Self::new(input_path, output_path),
        }
    }
}

/// Builder for CropOptions
#[derive(Debug)]
pub struct CropOptionsBuilder {
    options: CropOptions,
}

impl CropOptionsBuilder {
    /// Set the margin in pixels
    #[must_use]
    pub fn border_size(mut self, border_size: u32) -> Self {
        self.options.border_size = border_size;
        self
    }

    /// Enable verbose reporting
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    /// Enable the viewer preview
    #[must_use]
    pub fn show(mut self, show: bool) -> Self {
        self.options.show = show;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> CropOptions {
        self.options
    }
}

// ============================================================
// Progress
// ============================================================

/// Receives stage notifications from the pipeline
pub trait ProgressCallback {
    fn on_step_start(&self, _step: &str) {}
    fn on_step_complete(&self, _step: &str, _message: &str) {}
    fn on_debug(&self, _message: &str) {}
}

/// Callback that discards every event
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {}

// ============================================================
// Pipeline
// ============================================================

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct CropReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_size: (u32, u32),
    pub cropped_size: (u32, u32),
    pub background: Rgba<u8>,
    /// Share of the border ring covered by `background`
    pub coverage: f64,
    pub crop_box: CropBox,
}

impl CropReport {
    /// True when the crop box covers the whole input
    pub fn is_unchanged(&self) -> bool {
        self.original_size == self.cropped_size
    }
}

/// Border cropping pipeline
#[derive(Debug, Clone)]
pub struct CropPipeline {
    options: CropOptions,
}

impl CropPipeline {
    pub fn new(options: CropOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Run without progress output
    pub fn run(&self) -> Result<CropReport> {
        self.run_with_progress(&SilentProgress)
    }

    /// Run, reporting each stage to `progress`
    pub fn run_with_progress(&self, progress: &dyn ProgressCallback) -> Result<CropReport> {
        let options = &self.options;

        progress.on_step_start("Loading");
        let source = SourceImage::open(&options.input_path)?;
        if options.verbose {
            progress.on_step_complete("Loaded", &source.describe());
        }

        progress.on_step_start("Detecting border");
        let rgba = source.to_rgba();
        let (estimate, crop_box) = border::detect_crop_box(&rgba, options.border_size)?;
        drop(rgba);
        progress.on_debug(&format!(
            "background {:?} covers {}/{} ring pixels, crop box {}",
            estimate.color.0, estimate.count, estimate.ring_length, crop_box
        ));

        let cropped = crop_image(source.image(), &crop_box);

        if options.show {
            progress.on_step_start("Showing");
            if let Err(e) = sink::show(&cropped) {
                tracing::warn!(error = %e, "could not open image viewer");
            }
        }

        progress.on_step_start("Saving");
        sink::save(&options.output_path, &cropped)?;

        let report = CropReport {
            input_path: options.input_path.clone(),
            output_path: options.output_path.clone(),
            original_size: source.dimensions(),
            cropped_size: (crop_box.width(), crop_box.height()),
            background: estimate.color,
            coverage: estimate.coverage(),
            crop_box,
        };
        tracing::info!(
            input = %report.input_path.display(),
            output = %report.output_path.display(),
            crop_box = %report.crop_box,
            "border cropped"
        );
        progress.on_step_complete(
            "Saved",
            &format!(
                "{}x{} -> {}x{}",
                report.original_size.0,
                report.original_size.1,
                report.cropped_size.0,
                report.cropped_size.1
            ),
        );

        Ok(report)
    }
}

/// Crop the border of `input` into `output` with default options
pub fn crop_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CropReport> {
    CropPipeline::new(CropOptions::new(input.as_ref(), output.as_ref())).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderError;
    use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbaImage};
    use std::cell::RefCell;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn write_framed(path: &Path, size: u32, thickness: u32) {
        RgbaImage::from_fn(size, size, |x, y| {
            let inside = (thickness..size - thickness).contains(&x)
                && (thickness..size - thickness).contains(&y);
            if inside {
                RED
            } else {
                WHITE
            }
        })
        .save(path)
        .unwrap();
    }

    #[derive(Default)]
    struct RecordingProgress {
        steps: RefCell<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn on_step_start(&self, step: &str) {
            self.steps.borrow_mut().push(step.to_string());
        }
    }

    #[test]
    fn test_default_options() {
        let opts = CropOptions::new("in.png", "out.png");
        assert_eq!(opts.border_size, 0);
        assert!(!opts.verbose);
        assert!(!opts.show);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = CropOptions::builder("in.png", "out.png")
            .border_size(4)
            .verbose(true)
            .show(false)
            .build();
        assert_eq!(opts.input_path, PathBuf::from("in.png"));
        assert_eq!(opts.output_path, PathBuf::from("out.png"));
        assert_eq!(opts.border_size, 4);
        assert!(opts.verbose);
    }

    #[test]
    fn test_crop_white_frame() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.png");
        let output = temp_dir.path().join("out.png");
        write_framed(&input, 10, 1);

        let report = crop_file(&input, &output).unwrap();
        assert_eq!(report.crop_box, CropBox::new(1, 1, 9, 9));
        assert_eq!(report.original_size, (10, 10));
        assert_eq!(report.cropped_size, (8, 8));
        assert_eq!(report.background, WHITE);

        let out = image::open(&output).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (8, 8));
        assert!(out.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_margin_reaches_full_image() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.png");
        let output = temp_dir.path().join("out.png");
        write_framed(&input, 10, 1);

        let options = CropOptions::builder(&input, &output).border_size(1).build();
        let report = CropPipeline::new(options).run().unwrap();
        assert_eq!(report.crop_box, CropBox::full(10, 10));
        assert!(report.is_unchanged());
        assert_eq!(image::open(&output).unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn test_second_run_does_not_shrink() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.png");
        let first = temp_dir.path().join("first.png");
        let second = temp_dir.path().join("second.png");

        // White frame around a red square with a blue mark on each edge
        let blue = Rgba([0, 0, 255, 255]);
        let mut img = RgbaImage::from_pixel(9, 9, WHITE);
        for y in 2..7 {
            for x in 2..7 {
                img.put_pixel(x, y, RED);
            }
        }
        for (x, y) in [(4, 2), (2, 4), (6, 4), (4, 6)] {
            img.put_pixel(x, y, blue);
        }
        img.save(&input).unwrap();

        let report = crop_file(&input, &first).unwrap();
        assert_eq!(report.crop_box, CropBox::new(2, 2, 7, 7));

        let report = crop_file(&first, &second).unwrap();
        assert_eq!(report.background, RED);
        assert_eq!(report.crop_box, CropBox::full(5, 5));
        assert!(report.is_unchanged());
        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    }

    #[test]
    fn test_solid_result_is_not_recropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.png");
        let first = temp_dir.path().join("first.png");
        let second = temp_dir.path().join("second.png");
        write_framed(&input, 12, 3);

        crop_file(&input, &first).unwrap();
        // Solid red is all background the second time round
        let result = crop_file(&first, &second);
        assert!(matches!(result, Err(BorderError::InvalidCropBox(_))));
        assert!(!second.exists());
    }

    #[test]
    fn test_blank_image_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("blank.png");
        let output = temp_dir.path().join("out.png");
        RgbaImage::from_pixel(8, 8, WHITE).save(&input).unwrap();

        let result = crop_file(&input, &output);
        assert!(matches!(result, Err(BorderError::InvalidCropBox(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_low_confidence_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("split.png");
        let output = temp_dir.path().join("out.png");
        RgbaImage::from_fn(5, 5, |x, y| {
            if y == 0 || (x == 0 && y < 4) {
                Rgba([0, 0, 255, 255])
            } else if y == 4 || x == 4 {
                Rgba([0, 255, 0, 255])
            } else {
                RED
            }
        })
        .save(&input)
        .unwrap();

        let result = crop_file(&input, &output);
        assert!(matches!(
            result,
            Err(BorderError::LowConfidenceBackground { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("out.png");

        let result = crop_file(temp_dir.path().join("nope.png"), &output);
        assert!(matches!(result, Err(BorderError::ImageNotFound(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_gray_input_stays_gray() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("gray.png");
        let output = temp_dir.path().join("out.png");
        GrayImage::from_fn(6, 6, |x, y| {
            if (2..4).contains(&x) && (1..5).contains(&y) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
        .save(&input)
        .unwrap();

        let report = crop_file(&input, &output).unwrap();
        assert_eq!(report.crop_box, CropBox::new(2, 1, 4, 5));

        let out = image::open(&output).unwrap();
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
        assert_eq!(out.dimensions(), (2, 4));
    }

    #[test]
    fn test_output_is_deterministic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.png");
        let a = temp_dir.path().join("a.png");
        let b = temp_dir.path().join("b.png");
        write_framed(&input, 16, 4);

        let options = CropOptions::builder(&input, &a).border_size(2).build();
        CropPipeline::new(options).run().unwrap();
        let options = CropOptions::builder(&input, &b).border_size(2).build();
        CropPipeline::new(options).run().unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn test_progress_steps() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.png");
        let output = temp_dir.path().join("out.png");
        write_framed(&input, 10, 2);

        let progress = RecordingProgress::default();
        CropPipeline::new(CropOptions::new(&input, &output))
            .run_with_progress(&progress)
            .unwrap();

        assert_eq!(
            *progress.steps.borrow(),
            vec!["Loading", "Detecting border", "Saving"]
        );
    }
}
