//! Srcset construction.
//!
//! For each breakpoint below the image's intrinsic width, one derivative is
//! requested from the [`DerivativeProvider`] and added to both candidate
//! lists: its WebP URL to the `<source>` list and its original-format URL to
//! the `<img>` list. The original image always closes both lists, so even an
//! empty breakpoint set yields one candidate each.
//!
//! ```text
//! width 2000, breakpoints [400, 800, 2400]
//!   → a.400x0.webp 400w, a.800x0.webp 800w, a.webp 2000w
//!   → a.400x0.jpg 400w,  a.800x0.jpg 800w,  a.jpg 2000w
//! ```
//!
//! Breakpoints at or above the intrinsic width are skipped before the
//! provider is asked, so no derivative is ever requested that would have to
//! be upscaled.

use crate::asset::ImageAsset;
use crate::breakpoints::BreakpointSet;
use crate::imaging::{DerivativeError, DerivativeProvider};
use std::fmt;

/// One `srcset` candidate: URL plus width descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcsetEntry {
    pub url: String,
    pub width: u32,
}

impl SrcsetEntry {
    pub fn new(url: impl Into<String>, width: u32) -> Self {
        Self {
            url: url.into(),
            width,
        }
    }
}

impl fmt::Display for SrcsetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}w", self.url, self.width)
    }
}

/// Ordered candidate list for one `srcset` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Srcset(Vec<SrcsetEntry>);

impl Srcset {
    pub fn push(&mut self, entry: SrcsetEntry) {
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[SrcsetEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Widths in candidate order.
    pub fn widths(&self) -> Vec<u32> {
        self.0.iter().map(|e| e.width).collect()
    }

    /// Attribute value: `url 400w, url 800w`.
    pub fn to_attr(&self) -> String {
        self.0
            .iter()
            .map(SrcsetEntry::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a `srcset` attribute made of width descriptors.
    ///
    /// Candidates without a valid `Nw` descriptor are skipped. URLs must not
    /// contain commas.
    pub fn parse(attr: &str) -> Self {
        let entries = attr
            .split(',')
            .filter_map(|candidate| {
                let (url, descriptor) = candidate.trim().rsplit_once(char::is_whitespace)?;
                let width = descriptor.strip_suffix('w')?.parse().ok()?;
                let url = url.trim();
                (!url.is_empty()).then(|| SrcsetEntry::new(url, width))
            })
            .collect();
        Self(entries)
    }
}

impl fmt::Display for Srcset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attr())
    }
}

/// The two candidate lists of a `<picture>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Srcsets {
    /// Candidates for `<source type="image/webp">`.
    pub webp: Srcset,
    /// Candidates for `<img>`.
    pub fallback: Srcset,
}

/// Build both candidate lists for an image.
///
/// Fails with the provider's error for the first breakpoint whose derivative
/// cannot be produced; no partial lists are returned.
pub fn build(
    image: &ImageAsset,
    breakpoints: &BreakpointSet,
    provider: &impl DerivativeProvider,
) -> Result<Srcsets, DerivativeError> {
    let mut srcsets = Srcsets::default();

    for width in breakpoints.iter() {
        if width == 0 || width >= image.width {
            continue;
        }
        let derived = provider.derivative(image, width)?;
        srcsets.webp.push(SrcsetEntry::new(derived.webp_url, width));
        srcsets.fallback.push(SrcsetEntry::new(derived.url, width));
    }

    srcsets
        .webp
        .push(SrcsetEntry::new(image.webp_url.clone(), image.width));
    srcsets
        .fallback
        .push(SrcsetEntry::new(image.url.clone(), image.width));

    Ok(srcsets)
}
