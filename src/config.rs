//! Configuration layers.
//!
//! Rendering reads three configuration layers, all loaded once from a config
//! directory and then shared read-only by every render call:
//!
//! ```text
//! config/
//! ├── config.toml      # Global defaults (sparse, overrides stock defaults)
//! ├── templates.json   # { "<template name>": { partial options }, ... }
//! └── fields.json      # { "<field name>":    { partial options }, ... }
//! ```
//!
//! ## Global defaults
//!
//! `config.toml` is sparse: override just the keys you need:
//!
//! ```toml
//! figure = true
//! breakpoints = [480, 960]
//! ```
//!
//! The file is merged key-by-key on top of the stock defaults, unknown keys
//! are rejected to catch typos early, and the result is validated. Errors here
//! are fatal: a broken global config is a deployment problem.
//!
//! ## Context defaults
//!
//! `templates.json` and `fields.json` use the camelCase keys of the call-site
//! options (`pictureClass`, `figcaptionField`, `wrapperClass`, ...). These
//! files are edited by hand far more often, so loading them is forgiving: a
//! missing file is an empty map, and malformed JSON is logged as a warning
//! and also treated as an empty map. Rendering never sees a parse error.

use crate::breakpoints::BreakpointSet;
use crate::markup;
use crate::options::{CaptionFallback, FetchPriority, PartialOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Global render defaults loaded from `config.toml`.
///
/// Every key has a stock value; user files only override what they set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalDefaults {
    /// Alt text used when neither the call nor a context sets one.
    pub alt: String,
    /// Class on `<img>` when no layer sets `class`. A `class` from any
    /// layer replaces it; the two are never combined.
    pub image_class: String,
    /// Class on `<picture>`.
    pub picture_class: String,
    /// Emit `loading="lazy"`.
    pub lazy: bool,
    /// CSS `sizes` attribute.
    pub sizes: String,
    /// Widths to request derivatives at. Accepts an array or a CSV string.
    pub breakpoints: BreakpointSet,
    /// `fetchpriority` hint: "", "high", "low" or "auto".
    pub fetch_priority: FetchPriority,
    /// Wrap pictures in `<figure>`.
    pub figure: bool,
    pub figure_class: String,
    pub figcaption_class: String,
    /// Image field the caption is read from.
    pub figcaption_field: String,
    /// Caption fallback: "", "alt" or "basename".
    pub figcaption_fallback: CaptionFallback,
    /// Wrapper element for "render all"; empty disables the wrapper.
    pub wrapper_tag: String,
    pub wrapper_class: String,
    /// Class of the per-item `<div>`; empty disables item wrapping.
    pub item_class: String,
    /// Emit debug comments and data attributes.
    pub debug: bool,
    /// Persist statistics every N rendered images.
    pub stats_flush_every: u64,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            alt: String::new(),
            image_class: String::new(),
            picture_class: String::new(),
            lazy: true,
            sizes: "(max-width: 768px) 100vw, (max-width: 1200px) 50vw, 33vw".to_string(),
            breakpoints: BreakpointSet::from_widths([400, 800, 1200, 1600]),
            fetch_priority: FetchPriority::Unset,
            figure: false,
            figure_class: "figure".to_string(),
            figcaption_class: "figure__caption".to_string(),
            figcaption_field: "description".to_string(),
            figcaption_fallback: CaptionFallback::None,
            wrapper_tag: "div".to_string(),
            wrapper_class: "image-gallery".to_string(),
            item_class: "gallery-item".to_string(),
            debug: false,
            stats_flush_every: 10,
        }
    }
}

impl GlobalDefaults {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stats_flush_every == 0 {
            return Err(ConfigError::Validation(
                "stats_flush_every must be at least 1".into(),
            ));
        }
        if !self.wrapper_tag.is_empty() && !markup::is_element_name(&self.wrapper_tag) {
            return Err(ConfigError::Validation(format!(
                "wrapper_tag {:?} is not a valid element name",
                self.wrapper_tag
            )));
        }
        Ok(())
    }
}

/// Partial options keyed by template or field name.
pub type ContextDefaults = BTreeMap<String, PartialOptions>;

/// Read-only snapshot of every configuration layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    pub global: GlobalDefaults,
    pub templates: ContextDefaults,
    pub fields: ContextDefaults,
}

impl ConfigLayers {
    pub fn new(global: GlobalDefaults) -> Self {
        Self {
            global,
            templates: ContextDefaults::new(),
            fields: ContextDefaults::new(),
        }
    }

    pub fn with_template(mut self, name: impl Into<String>, options: PartialOptions) -> Self {
        self.templates.insert(name.into(), options);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, options: PartialOptions) -> Self {
        self.fields.insert(name.into(), options);
        self
    }

    /// Load all three layers from a config directory.
    ///
    /// Only `config.toml` problems are errors; see the module docs.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            global: load_config(dir)?,
            templates: load_context_defaults(&dir.join(TEMPLATES_FILE)),
            fields: load_context_defaults(&dir.join(FIELDS_FILE)),
        })
    }
}

pub const CONFIG_FILE: &str = "config.toml";
pub const TEMPLATES_FILE: &str = "templates.json";
pub const FIELDS_FILE: &str = "fields.json";

// =============================================================================
// Global defaults: loading, merging, validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GlobalDefaults::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GlobalDefaults, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GlobalDefaults = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load global defaults from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<GlobalDefaults, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

// =============================================================================
// Context defaults (templates.json / fields.json)
// =============================================================================

/// Parse a context-defaults JSON object strictly.
///
/// Blank input is an empty map. The document must be a JSON object; entries
/// whose value is not an object of options are skipped with a warning, so
/// one bad entry does not disable its siblings.
pub fn parse_context_defaults(json: &str) -> Result<ContextDefaults, ConfigError> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(ContextDefaults::new());
    }
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
    let mut map = ContextDefaults::new();
    for (name, value) in raw {
        match serde_json::from_value::<PartialOptions>(value) {
            Ok(options) => {
                map.insert(name, options);
            }
            Err(err) => warn!(context = %name, error = %err, "skipping invalid context defaults entry"),
        }
    }
    Ok(map)
}

/// Load a context-defaults file, recovering from every failure.
///
/// A missing file yields an empty map silently; unreadable or malformed
/// files yield an empty map and a warning.
pub fn load_context_defaults(path: &Path) -> ContextDefaults {
    if !path.exists() {
        return ContextDefaults::new();
    }
    let parsed = fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|content| parse_context_defaults(&content));
    match parsed {
        Ok(map) => map,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring malformed context defaults");
            ContextDefaults::new()
        }
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# picture-press configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Per-template and per-field overrides live next to this file:
#   templates.json -> { "home":    { "figure": true } }
#   fields.json    -> { "gallery": { "itemClass": "tile" } }
#
# Precedence, highest first: call-site options, field, template, this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# <img> and <picture>
# ---------------------------------------------------------------------------
# Alt text when none is given. Empty = image description, then file name.
alt = ""

# Class on <img> and on <picture>. Empty = no class attribute.
# A "class" set in templates.json, fields.json or at the call site replaces
# image_class rather than adding to it.
image_class = ""
picture_class = ""

# Emit loading="lazy" on <img>.
lazy = true

# CSS sizes attribute shared by <source> and <img>.
sizes = "(max-width: 768px) 100vw, (max-width: 1200px) 50vw, 33vw"

# Widths to request derivatives at. Widths at or above the image's own width
# are skipped; the original is always the last srcset candidate.
# A comma-separated string ("400, 800") is accepted too.
breakpoints = [400, 800, 1200, 1600]

# fetchpriority hint: "", "high", "low" or "auto".
fetch_priority = ""

# ---------------------------------------------------------------------------
# <figure> / <figcaption>
# ---------------------------------------------------------------------------
figure = false
figure_class = "figure"
figcaption_class = "figure__caption"

# Image field used as caption text.
figcaption_field = "description"

# When the caption field is empty: "" (no caption), "alt" or "basename".
figcaption_fallback = ""

# ---------------------------------------------------------------------------
# Collections ("render all")
# ---------------------------------------------------------------------------
# Wrapper element around all items. Empty = no wrapper.
wrapper_tag = "div"
wrapper_class = "image-gallery"

# Class of the <div> around each item. Empty = items are not wrapped.
item_class = "gallery-item"

# ---------------------------------------------------------------------------
# Diagnostics
# ---------------------------------------------------------------------------
# Emit an HTML comment and data-picture* attributes with each image.
debug = false

# Persist render statistics every N rendered images.
stats_flush_every = 10
"##
}
