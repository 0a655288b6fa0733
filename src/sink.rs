//! Output sink
//!
//! Writes the cropped image with the encoder matching the destination
//! extension, and optionally opens it in the platform image viewer.

use image::{DynamicImage, ImageError, ImageFormat};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::border::{BorderError, Result};

/// Viewers tried in order on platforms without a single system opener
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const UNIX_VIEWERS: &[&str] = &["xdg-open", "display", "eog", "feh"];

/// Resolve the encoder for `path` from its extension
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    match ImageFormat::from_path(path) {
        Ok(format) if format.writing_enabled() => Ok(format),
        _ => Err(BorderError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Encode `image` to `path`
///
/// The data goes to a temporary file next to `path` that is renamed over
/// the destination once fully written, so a failed save leaves nothing
/// behind.
pub fn save(path: impl AsRef<Path>, image: &DynamicImage) -> Result<()> {
    let path = path.as_ref();
    let format = output_format(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let save_error = |source: ImageError| BorderError::ImageSave {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".bordercrop-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| save_error(ImageError::IoError(e)))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        image.write_to(&mut writer, format).map_err(save_error)?;
        writer
            .flush()
            .map_err(|e| save_error(ImageError::IoError(e)))?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    temp.persist(path)
        .map_err(|e| save_error(ImageError::IoError(e.error)))?;

    tracing::debug!(path = %path.display(), ?format, "image saved");
    Ok(())
}

/// Open `image` in the platform viewer
///
/// A PNG preview is written to the temp directory and left there for the
/// viewer, which runs detached. Returns the preview path.
pub fn show(image: &DynamicImage) -> Result<PathBuf> {
    let mut preview = tempfile::Builder::new()
        .prefix("bordercrop-preview-")
        .suffix(".png")
        .tempfile()?;

    {
        let mut writer = BufWriter::new(preview.as_file_mut());
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|source| BorderError::ImageSave {
                path: PathBuf::from("<preview>"),
                source,
            })?;
        writer.flush()?;
    }

    let (_, path) = preview.keep().map_err(|e| BorderError::IoError(e.error))?;

    let mut command = viewer_command(&path).ok_or_else(|| {
        BorderError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no image viewer found",
        ))
    })?;
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    tracing::info!(preview = %path.display(), "opened image viewer");
    Ok(path)
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Option<Command> {
    let mut command = Command::new("open");
    command.arg(path);
    Some(command)
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Option<Command> {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    Some(command)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Option<Command> {
    let viewer = UNIX_VIEWERS
        .iter()
        .find_map(|name| which::which(name).ok())?;
    let mut command = Command::new(viewer);
    command.arg(path);
    Some(command)
}
