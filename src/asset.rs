//! Image assets and their rendering context.
//!
//! An [`ImageAsset`] is owned by the host system; this crate only reads it.
//! Where an image is rendered (which page template, which image field) is
//! described by a [`ContextKey`]. Both single images and collections expose
//! their key through [`ContextProvider`], so the pipeline never has to inspect
//! the concrete type for page or field information.

use crate::imaging;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// An image as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// URL of the original file.
    pub url: String,
    /// URL of the WebP rendition of the original.
    pub webp_url: String,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// File name including extension, e.g. `sunset-beach.jpg`.
    pub basename: String,
    /// Named text fields (`description`, `tags`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Template of the page that owns this image, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_template: Option<String>,
}

impl ImageAsset {
    /// Build an asset from its URL; the basename and WebP URL are derived
    /// from the URL's last path segment.
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        let url = url.into();
        Self {
            webp_url: imaging::webp_url(&url),
            basename: imaging::file_name(&url).to_string(),
            url,
            width,
            height,
            fields: BTreeMap::new(),
            page_template: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_page_template(mut self, template: impl Into<String>) -> Self {
        self.page_template = Some(template.into());
        self
    }

    /// Read a named field.
    ///
    /// `basename`/`name` and `url` are answered from the asset itself; every
    /// other key is looked up in [`fields`](Self::fields).
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "basename" | "name" => Some(&self.basename),
            "url" => Some(&self.url),
            _ => self.fields.get(key).map(String::as_str),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.basename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.basename)
    }
}

/// The images of one field on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCollection {
    pub images: Vec<ImageAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ImageCollection {
    pub fn new(images: Vec<ImageAsset>) -> Self {
        Self {
            images,
            page_template: None,
            field: None,
        }
    }

    pub fn with_context(
        mut self,
        template: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.page_template = Some(template.into());
        self.field = Some(field.into());
        self
    }

    pub fn first(&self) -> Option<&ImageAsset> {
        self.images.first()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// `(template, field)` pair selecting context defaults. Either part may be
/// empty, meaning "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContextKey {
    pub template: String,
    pub field: String,
}

impl ContextKey {
    pub fn new(template: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            field: field.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Anything that knows where it is being rendered.
pub trait ContextProvider {
    fn context(&self) -> ContextKey;
}

impl ContextProvider for ImageAsset {
    /// A lone image knows its page, never its field.
    fn context(&self) -> ContextKey {
        ContextKey::new(self.page_template.clone().unwrap_or_default(), "")
    }
}

impl ContextProvider for ImageCollection {
    fn context(&self) -> ContextKey {
        ContextKey::new(
            self.page_template.clone().unwrap_or_default(),
            self.field.clone().unwrap_or_default(),
        )
    }
}
