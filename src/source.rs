//! Image source
//!
//! Loads the input raster and keeps it in its native color type. Detection
//! works on an RGBA copy from [`SourceImage::to_rgba`]; the crop is taken
//! from the original so the output keeps the input's pixel format.

use image::{ColorType, DynamicImage, GenericImageView, ImageError, ImageFormat, ImageReader, RgbaImage};
use std::path::{Path, PathBuf};

use crate::border::{BorderError, Result};

/// A decoded input image with its format metadata
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl SourceImage {
    /// Open and decode an image file
    ///
    /// The container format is guessed from the file content first and the
    /// extension second.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |source: ImageError| BorderError::ImageLoad {
            path: path.to_path_buf(),
            source,
        };

        match path.try_exists() {
            Ok(true) => {}
            Ok(false) => return Err(BorderError::ImageNotFound(path.to_path_buf())),
            Err(e) => return Err(load_error(ImageError::IoError(e))),
        }

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| load_error(ImageError::IoError(e)))?;
        let format = reader.format();
        let image = reader.decode().map_err(load_error)?;

        Self::from_parts(path, image, format)
    }

    /// Wrap an already decoded image
    pub fn from_parts(
        path: impl Into<PathBuf>,
        image: DynamicImage,
        format: Option<ImageFormat>,
    ) -> Result<Self> {
        let path = path.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(BorderError::InvalidImage(format!(
                "{} has zero size",
                path.display()
            )));
        }

        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "image loaded"
        );

        Ok(Self {
            path,
            image,
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size as `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Detected container format, if any
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Native color type of the decoded pixels
    pub fn color_type(&self) -> ColorType {
        self.image.color()
    }

    /// The original image, untouched
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// RGBA copy used for analysis
    pub fn to_rgba(&self) -> RgbaImage {
        self.image.to_rgba8()
    }

    /// One-line `format size color` summary
    pub fn describe(&self) -> String {
        let format = self
            .format
            .map(|f| format!("{:?}", f).to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        format!(
            "{} {}x{} {:?}",
            format,
            self.width(),
            self.height(),
            self.color_type()
        )
    }
}
