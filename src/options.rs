//! Render option records.
//!
//! Two shapes exist for the same set of keys:
//!
//! - [`PartialOptions`]: one configuration layer (template defaults, field
//!   defaults, or call-site options). Every key is optional; an absent key
//!   means "this layer has no opinion".
//! - [`RenderOptions`]: the effective, fully concrete record for one render
//!   call, produced by [`crate::resolve`]. Every key has a value.
//!
//! Partial layers use the camelCase key names of the persisted JSON maps
//! (`pictureClass`, `figcaptionFallback`, ...). Values are parsed leniently:
//! flags accept `true`/`1`/`"1"`, and unknown enum strings degrade to "unset"
//! rather than failing the whole layer.

use crate::breakpoints::BreakpointSet;
use serde::{Deserialize, Deserializer, Serialize};

/// `fetchpriority` hint on `<img>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FetchPriority {
    /// No attribute is emitted.
    #[default]
    Unset,
    High,
    Low,
    Auto,
}

impl FetchPriority {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "high" => Self::High,
            "low" => Self::Low,
            "auto" => Self::Auto,
            _ => Self::Unset,
        }
    }

    /// Attribute value, or `None` when nothing should be emitted.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::High => Some("high"),
            Self::Low => Some("low"),
            Self::Auto => Some("auto"),
        }
    }
}

impl From<String> for FetchPriority {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FetchPriority> for String {
    fn from(value: FetchPriority) -> Self {
        value.as_attr().unwrap_or_default().to_string()
    }
}

/// What to show in `<figcaption>` when the caption field is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaptionFallback {
    /// No caption.
    #[default]
    None,
    /// The resolved alt text.
    Alt,
    /// The image file name without its extension.
    Basename,
}

impl CaptionFallback {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "alt" => Self::Alt,
            "basename" => Self::Basename,
            _ => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Alt => "alt",
            Self::Basename => "basename",
        }
    }
}

impl From<String> for CaptionFallback {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CaptionFallback> for String {
    fn from(value: CaptionFallback) -> Self {
        value.as_str().to_string()
    }
}

/// Effective options for a single render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Explicit alt text; empty means "derive from the image".
    pub alt: String,
    /// Class attribute on `<img>`.
    pub class: String,
    /// Class attribute on `<picture>`.
    pub picture_class: String,
    pub lazy: bool,
    /// CSS `sizes` value shared by `<source>` and `<img>`.
    pub sizes: String,
    pub breakpoints: BreakpointSet,
    pub fetch_priority: FetchPriority,
    /// Wrap the picture in `<figure>`.
    pub figure: bool,
    pub figure_class: String,
    pub figcaption_class: String,
    /// Image field read for the caption text.
    pub figcaption_field: String,
    pub figcaption_fallback: CaptionFallback,
}

/// Effective wrapper settings for the "render all" entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Wrapper element name; empty means no wrapper element.
    pub wrapper_tag: String,
    pub wrapper_class: String,
    /// Class of the per-item `<div>`; empty means items are not wrapped.
    pub item_class: String,
}

/// One configuration layer: every key optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_class: Option<String>,
    #[serde(
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub lazy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<BreakpointSet>,
    #[serde(
        rename = "fetchpriority",
        alias = "fetchPriority",
        skip_serializing_if = "Option::is_none"
    )]
    pub fetch_priority: Option<FetchPriority>,
    #[serde(
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub figure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figcaption_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figcaption_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figcaption_fallback: Option<CaptionFallback>,

    // Collection-level keys, only read by the "render all" entry point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_class: Option<String>,
}

impl PartialOptions {
    /// Overwrite every key that `overlay` sets; keys it leaves unset keep
    /// their current value.
    pub fn overlay(&mut self, overlay: &PartialOptions) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        take(&mut self.alt, &overlay.alt);
        take(&mut self.class, &overlay.class);
        take(&mut self.picture_class, &overlay.picture_class);
        take(&mut self.lazy, &overlay.lazy);
        take(&mut self.sizes, &overlay.sizes);
        take(&mut self.breakpoints, &overlay.breakpoints);
        take(&mut self.fetch_priority, &overlay.fetch_priority);
        take(&mut self.figure, &overlay.figure);
        take(&mut self.figure_class, &overlay.figure_class);
        take(&mut self.figcaption_class, &overlay.figcaption_class);
        take(&mut self.figcaption_field, &overlay.figcaption_field);
        take(&mut self.figcaption_fallback, &overlay.figcaption_fallback);
        take(&mut self.wrapper, &overlay.wrapper);
        take(&mut self.wrapper_class, &overlay.wrapper_class);
        take(&mut self.item_class, &overlay.item_class);
    }
}

/// Accept `true`, `1`, `"1"`, `"true"` (and their negatives) for boolean keys.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
        Raw::Float(f) => f != 0.0,
        Raw::Text(s) => !matches!(s.trim(), "" | "0" | "false"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_priority_parses_known_values() {
        assert_eq!(FetchPriority::parse("high"), FetchPriority::High);
        assert_eq!(FetchPriority::parse(" low "), FetchPriority::Low);
        assert_eq!(FetchPriority::parse("auto"), FetchPriority::Auto);
        assert_eq!(FetchPriority::parse(""), FetchPriority::Unset);
        assert_eq!(FetchPriority::parse("urgent"), FetchPriority::Unset);
    }

    #[test]
    fn caption_fallback_parses_known_values() {
        assert_eq!(CaptionFallback::parse("alt"), CaptionFallback::Alt);
        assert_eq!(CaptionFallback::parse("basename"), CaptionFallback::Basename);
        assert_eq!(CaptionFallback::parse("title"), CaptionFallback::None);
    }

    #[test]
    fn partial_options_use_camel_case_keys() {
        let json = r#"{
            "pictureClass": "pic",
            "figcaptionFallback": "basename",
            "fetchpriority": "high",
            "wrapperClass": "grid",
            "breakpoints": "800, 400"
        }"#;
        let opts: PartialOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.picture_class.as_deref(), Some("pic"));
        assert_eq!(opts.figcaption_fallback, Some(CaptionFallback::Basename));
        assert_eq!(opts.fetch_priority, Some(FetchPriority::High));
        assert_eq!(opts.wrapper_class.as_deref(), Some("grid"));
        assert_eq!(opts.breakpoints.unwrap().as_slice(), &[400, 800]);
        assert_eq!(opts.figure, None);
    }

    #[test]
    fn fetch_priority_camel_case_alias_is_accepted() {
        let opts: PartialOptions = serde_json::from_str(r#"{"fetchPriority": "low"}"#).unwrap();
        assert_eq!(opts.fetch_priority, Some(FetchPriority::Low));
    }

    #[test]
    fn flags_accept_numbers_and_strings() {
        let opts: PartialOptions =
            serde_json::from_str(r#"{"figure": 1, "lazy": "0"}"#).unwrap();
        assert_eq!(opts.figure, Some(true));
        assert_eq!(opts.lazy, Some(false));

        let opts: PartialOptions =
            serde_json::from_str(r#"{"figure": false, "lazy": null}"#).unwrap();
        assert_eq!(opts.figure, Some(false));
        assert_eq!(opts.lazy, None);
    }

    #[test]
    fn bad_breakpoint_entry_does_not_reject_call_options() {
        let opts: PartialOptions =
            serde_json::from_str(r#"{"figure": true, "breakpoints": [400, true, 800]}"#).unwrap();
        assert_eq!(opts.figure, Some(true));
        assert_eq!(opts.breakpoints.unwrap().as_slice(), &[400, 800]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let opts: PartialOptions = serde_json::from_str(r#"{"quality": 80}"#).unwrap();
        assert_eq!(opts, PartialOptions::default());
    }

    #[test]
    fn overlay_replaces_only_set_keys() {
        let mut base = PartialOptions {
            class: Some("base".into()),
            figure: Some(true),
            ..Default::default()
        };
        let top = PartialOptions {
            class: Some("top".into()),
            sizes: Some("100vw".into()),
            ..Default::default()
        };
        base.overlay(&top);
        assert_eq!(base.class.as_deref(), Some("top"));
        assert_eq!(base.sizes.as_deref(), Some("100vw"));
        assert_eq!(base.figure, Some(true));
    }

    #[test]
    fn serialization_skips_unset_keys() {
        let opts = PartialOptions {
            figure: Some(true),
            fetch_priority: Some(FetchPriority::Auto),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&opts).unwrap(),
            r#"{"fetchpriority":"auto","figure":true}"#
        );
    }
}
