//! bordercrop - crop a uniform-color border away from an image
//!
//! The library exposes each stage separately so it can be used without the
//! command line:
//!
//! - [`source`] loads an image and keeps its native pixel format
//! - [`border`] estimates the background color and computes the crop box
//! - [`sink`] writes the result without leaving partial files
//! - [`pipeline`] chains the stages
//!
//! # Example
//!
//! ```rust,no_run
//! use bordercrop::{CropOptions, CropPipeline};
//!
//! let options = CropOptions::builder("scan.png", "cropped.png")
//!     .border_size(2)
//!     .build();
//! let report = CropPipeline::new(options).run().unwrap();
//! println!("kept {}", report.crop_box);
//! ```

pub mod border;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use border::{
    crop_image, detect_crop_box, BackgroundEstimate, BackgroundEstimator, BorderError, CropBox,
    CropBoxCalculator,
};
pub use cli::{exit_codes, Cli};
pub use config::{CliOverrides, Config, ConfigError};
pub use pipeline::{
    crop_file, CropOptions, CropOptionsBuilder, CropPipeline, CropReport, ProgressCallback,
    SilentProgress,
};
pub use source::SourceImage;
