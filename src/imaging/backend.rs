//! Derivative provider trait and shared types.
//!
//! The host system owns resizing and WebP conversion. The renderer only
//! needs one capability from it: "give me this image at width W", via
//! [`DerivativeProvider`]. Implementations must never upscale; a request at
//! or above the intrinsic width may return the original.
//!
//! The production implementation shipped with this crate is
//! [`NamingProvider`](super::naming::NamingProvider), which derives URLs from
//! the host's file naming convention without touching pixels.

use crate::asset::ImageAsset;
use thiserror::Error;

/// A resized derivative could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot generate {width}px derivative of {image}: {reason}")]
pub struct DerivativeError {
    /// Basename of the source image.
    pub image: String,
    /// Requested width.
    pub width: u32,
    pub reason: String,
}

impl DerivativeError {
    pub fn new(image: &ImageAsset, width: u32, reason: impl Into<String>) -> Self {
        Self {
            image: image.basename.clone(),
            width,
            reason: reason.into(),
        }
    }
}

/// Source of resized image variants.
///
/// `Sync` so one provider can be shared by render calls on different threads.
pub trait DerivativeProvider: Sync {
    /// Produce a derivative `width` pixels wide, with upscaling disabled.
    ///
    /// The returned asset's `url` is the resized original-format file and
    /// its `webp_url` the resized WebP file.
    fn derivative(&self, image: &ImageAsset, width: u32) -> Result<ImageAsset, DerivativeError>;
}

impl<P: DerivativeProvider + ?Sized> DerivativeProvider for &P {
    fn derivative(&self, image: &ImageAsset, width: u32) -> Result<ImageAsset, DerivativeError> {
        (**self).derivative(image, width)
    }
}
