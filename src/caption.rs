//! Figure caption resolution.
//!
//! The caption is read from a configurable image field (usually
//! `description`). When that field is missing or blank, the configured
//! [`CaptionFallback`] decides what to show instead. An empty result means
//! no `<figcaption>` is rendered at all.

use crate::asset::ImageAsset;
use crate::options::CaptionFallback;

/// Resolve the caption text for an image.
///
/// `alt` is the already-resolved alt text, used by the `alt` fallback.
pub fn resolve(image: &ImageAsset, field: &str, fallback: CaptionFallback, alt: &str) -> String {
    let from_field = (!field.is_empty())
        .then(|| image.get(field))
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(text) = from_field {
        return text.to_string();
    }

    match fallback {
        CaptionFallback::None => String::new(),
        CaptionFallback::Alt => alt.to_string(),
        CaptionFallback::Basename => image.stem().to_string(),
    }
}
