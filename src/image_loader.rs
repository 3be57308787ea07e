//! Image loading for strip photographs
//!
//! This module provides the single entry point for turning an image file into
//! the decoded RGB pixel array the pipeline works on.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: JPEG, PNG, GIF (first frame), WebP, TIFF, BMP.
//!
//! ## Design
//!
//! The format is taken from the file contents when they are recognizable and
//! from the extension otherwise, so a mislabeled PNG still loads. Every
//! failure, including a missing file, surfaces as `ImageLoadError`; no
//! placeholder image is ever substituted.

use image::{ImageReader, RgbImage};
use std::path::Path;
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Load an image from disk as 8-bit RGB
///
/// # Arguments
///
/// * `path` - Path to the image file
///
/// # Returns
///
/// Decoded `RgbImage`; alpha is dropped and other pixel types are converted
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if:
/// - File does not exist or cannot be opened
/// - Format is not supported
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use strip_colorscan::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("strip.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), strip_colorscan::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    if !path.is_file() {
        return Err(AnalysisError::ImageLoadError {
            message: format!("Image file not found: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path)
        .map_err(|e| {
            AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
        })?
        .with_guessed_format()
        .map_err(|e| {
            AnalysisError::image_load(format!("Failed to read image file: {}", path.display()), e)
        })?;

    if reader.format().is_none() && ImageFormat::from_extension(path).is_none() {
        return Err(AnalysisError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let image = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = image.to_rgb8();
    debug!(width = rgb.width(), height = rgb.height(), path = %path.display(), "image loaded");
    Ok(rgb)
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
