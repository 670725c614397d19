//! URL naming convention for derivatives.
//!
//! The host stores resized variants next to the original, with the target
//! size spliced in before the extension and a WebP sibling for every file:
//!
//! ```text
//! sunset.jpg            original
//! sunset.webp           original, WebP
//! sunset.400x0.jpg      400px wide, height follows aspect ratio
//! sunset.400x0.webp     400px wide, WebP
//! ```
//!
//! [`NamingProvider`] answers derivative requests purely from this
//! convention. It assumes the host generates the files on first request.

use super::backend::{DerivativeError, DerivativeProvider};
use super::calculations::calculate_derivative_dimensions;
use crate::asset::ImageAsset;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Bytes escaped in a path segment. Whitespace and commas must go, since
/// `srcset` splits candidates on them.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b',')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a file name for use as one URL path segment.
///
/// Non-ASCII characters are encoded as UTF-8 bytes.
pub fn encode_path_segment(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT).to_string()
}

/// Last path segment of a URL.
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Split a URL into `(everything before the extension, extension)`.
///
/// Only the last path segment is considered, so dots in directory names are
/// left alone. A leading dot (`.hidden`) is not an extension.
fn split_extension(url: &str) -> (&str, Option<&str>) {
    let name_start = url.len() - file_name(url).len();
    match url[name_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = name_start + dot;
            (&url[..dot], Some(&url[dot + 1..]))
        }
        _ => (url, None),
    }
}

/// URL of the WebP sibling of a file.
pub fn webp_url(url: &str) -> String {
    let (stem, _) = split_extension(url);
    format!("{stem}.webp")
}

/// URL of the `width`-wide derivative of a file, in its original format.
pub fn derivative_url(url: &str, width: u32) -> String {
    match split_extension(url) {
        (stem, Some(ext)) => format!("{stem}.{width}x0.{ext}"),
        (stem, None) => format!("{stem}.{width}x0"),
    }
}

/// Derivative provider backed by the naming convention above.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingProvider;

impl DerivativeProvider for NamingProvider {
    fn derivative(&self, image: &ImageAsset, width: u32) -> Result<ImageAsset, DerivativeError> {
        if width == 0 {
            return Err(DerivativeError::new(image, width, "width must be positive"));
        }
        if file_name(&image.url).is_empty() {
            return Err(DerivativeError::new(image, width, "image URL has no file name"));
        }
        if width >= image.width {
            return Ok(image.clone());
        }

        let (w, h) = calculate_derivative_dimensions((image.width, image.height), width);
        let url = derivative_url(&image.url, w);
        Ok(ImageAsset {
            webp_url: webp_url(&url),
            basename: file_name(&url).to_string(),
            url,
            width: w,
            height: h,
            fields: image.fields.clone(),
            page_template: image.page_template.clone(),
        })
    }
}
