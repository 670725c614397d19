//! Intrinsic dimension lookup via the `image` crate.
//!
//! Only the header is read; no pixels are decoded.

use image::ImageFormat;
use std::path::Path;
use std::sync::LazyLock;

/// Width and height of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Extensions whose decoders are compiled in.
const CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions that can be identified.
pub fn supported_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether a path has an identifiable image extension (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| supported_extensions().contains(&e.as_str()))
}

/// Read an image's intrinsic dimensions from its header.
pub fn identify(path: &Path) -> Result<Dimensions, image::ImageError> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(Dimensions { width, height })
}
