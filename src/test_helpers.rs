//! Shared test utilities for the picture-press test suite.
//!
//! Image builders, a recording stats sink, and fixture writers. The mock
//! derivative provider lives next to its trait in
//! [`crate::imaging::backend::tests`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let stats = RecordingStats::default();
//! let renderer = Renderer::new(&layers, &provider).with_stats(&stats);
//! renderer.render_all(&collection(&["a.jpg", "b.jpg"]), &figure_on())?;
//!
//! assert_eq!(stats.count(Counter::RenderCalls), 2);
//! ```

use std::path::Path;
use std::sync::Mutex;

use crate::asset::{ImageAsset, ImageCollection};
use crate::options::PartialOptions;
use crate::stats::{Counter, StatsSink};

// =========================================================================
// Image builders
// =========================================================================

/// Image at `/files/<name>` with the given intrinsic size.
pub fn sized(name: &str, width: u32, height: u32) -> ImageAsset {
    ImageAsset::new(format!("/files/{name}"), width, height)
}

/// A 2000×1500 image, wide enough for every stock breakpoint.
pub fn landscape(name: &str) -> ImageAsset {
    sized(name, 2000, 1500)
}

/// Collection of landscape images with no render context.
pub fn collection(names: &[&str]) -> ImageCollection {
    ImageCollection::new(names.iter().map(|n| landscape(n)).collect())
}

// =========================================================================
// Option builders
// =========================================================================

/// Partial options that only switch on `<figure>`.
pub fn figure_on() -> PartialOptions {
    PartialOptions {
        figure: Some(true),
        ..Default::default()
    }
}

// =========================================================================
// Stats
// =========================================================================

/// Stats sink that remembers every increment.
#[derive(Debug, Default)]
pub struct RecordingStats {
    seen: Mutex<Vec<Counter>>,
}

impl RecordingStats {
    pub fn count(&self, counter: Counter) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == counter)
            .count()
    }
}

impl StatsSink for RecordingStats {
    fn increment(&self, counter: Counter) {
        self.seen.lock().unwrap().push(counter);
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// Write a black PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::new(width, height).save(path).unwrap();
}
