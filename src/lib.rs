//! # Picture Press
//!
//! Responsive `<picture>` markup for CMS-managed images. Every image is
//! rendered with a WebP `<source>` and a fallback `<img>`, each carrying a
//! `srcset` built from width breakpoints, with intrinsic dimensions, lazy
//! loading and an optional `<figure>`/`<figcaption>` wrapper.
//!
//! # Architecture: Layered Options, Linear Pipeline
//!
//! Rendering options come from four layers. The first one that sets a key
//! wins, and every key is resolved on its own:
//!
//! ```text
//! call-site options  >  field defaults  >  template defaults  >  global defaults
//!                        (fields.json)     (templates.json)     (config.toml)
//! ```
//!
//! Which template and field layers apply depends on where the image is
//! rendered: the page template that owns it, and the image field it came
//! from. Once options are resolved, each image flows through one pipeline:
//!
//! ```text
//! options → srcsets (derivatives) → caption → markup
//! ```
//!
//! Derivative images are produced by a host-supplied
//! [`imaging::DerivativeProvider`]; this crate only decides which widths to
//! ask for and how to name them in markup.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Entry points: render one image, the first of a collection, or all of it |
//! | [`resolve`] | Four-layer option resolution for a render context |
//! | [`options`] | Partial (per-layer) and effective option types, lenient JSON parsing |
//! | [`breakpoints`] | Sorted, deduplicated width sets parsed from CSV or lists |
//! | [`config`] | `config.toml` loading, validation and merging; `templates.json`/`fields.json` |
//! | [`asset`] | Image assets, collections and their render context |
//! | [`srcset`] | Candidate lists for the WebP and fallback `srcset` attributes |
//! | [`caption`] | `<figcaption>` text from an image field with fallbacks |
//! | [`markup`] | HTML assembly with Maud |
//! | [`imaging`] | Derivative provider seam, derivative naming, header-only identify |
//! | [`stats`] | Render counters with periodic best-effort persistence |
//! | [`scan`] | Image collections from a directory on disk |
//!
//! # Design Decisions
//!
//! ## Maud Over String Building
//!
//! `<picture>` and `<figure>` markup is generated with
//! [Maud](https://maud.lambda.xyz/). Every URL, class and caption is escaped
//! at interpolation, so alt text and captions are kept as plain text all the
//! way through and never double-escaped.
//!
//! ## Immutable Config Snapshot
//!
//! [`config::ConfigLayers`] is loaded once and shared by reference. Nothing
//! mutates it during rendering, so one [`pipeline::Renderer`] can serve
//! concurrent calls.
//!
//! ## No Upscaling
//!
//! Breakpoints at or above an image's intrinsic width are skipped; the
//! original always closes both `srcset` lists at its own width.

pub mod asset;
pub mod breakpoints;
pub mod caption;
pub mod config;
pub mod imaging;
pub mod markup;
pub mod options;
pub mod pipeline;
pub mod resolve;
pub mod scan;
pub mod srcset;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_helpers;
