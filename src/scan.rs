//! Directory scanning.
//!
//! Turns a flat directory of image files into an [`ImageCollection`], for
//! rendering straight from disk:
//!
//! ```text
//! photos/
//! ├── dawn.jpg          → /media/dawn.jpg      (1600×1067)
//! ├── dawn.txt          → description of dawn.jpg
//! ├── harbour.png       → /media/harbour.png   (2400×1600)
//! └── notes.md          (ignored)
//! ```
//!
//! Images are ordered by file name. Subdirectories are not descended into.
//! File names are percent-encoded in URLs (`my photo.jpg` → `my%20photo.jpg`).
//! Dimensions come from the image header only, and headers are read in
//! parallel with [rayon](https://docs.rs/rayon).

use crate::asset::{ImageAsset, ImageCollection};
use crate::imaging;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read dimensions of {path}: {source}")]
    Identify {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Scan `dir` for images, publishing them under `base_url`.
pub fn scan_dir(dir: &Path, base_url: &str) -> Result<ImageCollection, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && imaging::is_supported(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    let images = paths
        .par_iter()
        .map(|path| load_image(path, base_url))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(dir = %dir.display(), count = images.len(), "directory scanned");
    Ok(ImageCollection::new(images))
}

fn load_image(path: &Path, base_url: &str) -> Result<ImageAsset, ScanError> {
    let dims = imaging::identify(path).map_err(|source| ScanError::Identify {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let url = join_url(base_url, &imaging::encode_path_segment(&name));
    let mut image = ImageAsset::new(url, dims.width, dims.height);
    // Alt and caption fallbacks show the name as it is on disk
    image.basename = name;
    if let Some(description) = read_sidecar(path) {
        image = image.with_field("description", description);
    }
    Ok(image)
}

/// Read the sidecar `.txt` next to an image (`dawn.jpg` → `dawn.txt`).
///
/// Returns `None` if the file doesn't exist or is blank.
pub fn read_sidecar(image_path: &Path) -> Option<String> {
    std::fs::read_to_string(image_path.with_extension("txt"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn join_url(base_url: &str, name: &str) -> String {
    if base_url.is_empty() {
        name.to_string()
    } else if base_url.ends_with('/') {
        format!("{base_url}{name}")
    } else {
        format!("{base_url}/{name}")
    }
}
