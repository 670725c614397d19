//! Render pipeline: the caller-facing entry points.
//!
//! Each image goes through the same stages, in order, with no retries:
//!
//! ```text
//! context → options → srcsets → caption → markup
//! ```
//!
//! - **context**: `(template, field)` from the image or collection
//! - **options**: call-site options merged over field, template and global defaults
//! - **srcsets**: derivative requests for every breakpoint below the intrinsic width
//! - **caption**: only when the effective options ask for a `<figure>`
//! - **markup**: `<picture>`, optionally inside `<figure>`
//!
//! ## Failure policy
//!
//! A derivative that cannot be produced fails the render call. For
//! [`Renderer::render_all`] that means the whole batch: no partial markup is
//! returned.

use crate::asset::{ContextKey, ContextProvider, ImageAsset, ImageCollection};
use crate::caption;
use crate::config::ConfigLayers;
use crate::imaging::{DerivativeError, DerivativeProvider};
use crate::markup;
use crate::options::{PartialOptions, RenderOptions};
use crate::resolve;
use crate::srcset;
use crate::stats::{Counter, NoStats, StatsSink};
use maud::html;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Derivative generation failed: {0}")]
    Derivative(#[from] DerivativeError),
}

/// Renders markup against one configuration snapshot.
///
/// Holds only shared references, so one renderer can serve any number of
/// calls, including concurrent ones.
pub struct Renderer<'a, P: DerivativeProvider> {
    layers: &'a ConfigLayers,
    provider: &'a P,
    stats: &'a dyn StatsSink,
}

impl<'a, P: DerivativeProvider> Renderer<'a, P> {
    pub fn new(layers: &'a ConfigLayers, provider: &'a P) -> Self {
        Self {
            layers,
            provider,
            stats: &NoStats,
        }
    }

    pub fn with_stats(mut self, stats: &'a dyn StatsSink) -> Self {
        self.stats = stats;
        self
    }

    /// Render a single image.
    ///
    /// The template comes from the image's page; a lone image has no field.
    pub fn render_image(
        &self,
        image: &ImageAsset,
        call: &PartialOptions,
    ) -> Result<String, RenderError> {
        let ctx = image.context();
        let options = resolve::resolve(call, &ctx, self.layers);
        self.render_with(image, &ctx, &options)
    }

    /// Render the first image of a collection; empty collections render
    /// nothing.
    pub fn render_first(
        &self,
        images: &ImageCollection,
        call: &PartialOptions,
    ) -> Result<String, RenderError> {
        let Some(first) = images.first() else {
            return Ok(String::new());
        };
        let ctx = images.context();
        let options = resolve::resolve(call, &ctx, self.layers);
        self.render_with(first, &ctx, &options)
    }

    /// Render every image of a collection inside the configured wrapper.
    ///
    /// Fails on the first image that cannot be rendered.
    pub fn render_all(
        &self,
        images: &ImageCollection,
        call: &PartialOptions,
    ) -> Result<String, RenderError> {
        if images.is_empty() {
            return Ok(String::new());
        }
        let ctx = images.context();
        let options = resolve::resolve(call, &ctx, self.layers);
        let collection = resolve::resolve_collection(call, &ctx, self.layers);

        let items = images
            .images
            .iter()
            .map(|image| self.render_with(image, &ctx, &options))
            .collect::<Result<Vec<_>, _>>()?;

        self.stats.increment(Counter::ImagesAllCalls);
        Ok(markup::render_collection(&items, &collection))
    }

    fn render_with(
        &self,
        image: &ImageAsset,
        ctx: &ContextKey,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        debug!(
            image = %image.basename,
            template = %ctx.template,
            field = %ctx.field,
            figure = options.figure,
            "options resolved"
        );

        let srcsets = srcset::build(image, &options.breakpoints, self.provider)?;
        debug!(
            image = %image.basename,
            candidates = srcsets.fallback.len(),
            "srcsets built"
        );

        let alt = markup::resolve_alt(image, options);
        let caption = if options.figure {
            caption::resolve(
                image,
                &options.figcaption_field,
                options.figcaption_fallback,
                &alt,
            )
        } else {
            String::new()
        };

        let debug_mode = self.layers.global.debug;
        let picture = markup::render_picture(image, options, &srcsets, &alt, debug_mode);
        let body = if options.figure {
            markup::render_figure(
                picture,
                &caption,
                &options.figure_class,
                &options.figcaption_class,
            )
        } else {
            picture
        };

        let html = html! {
            @if debug_mode {
                (markup::debug_comment(options))
            }
            (body)
        };

        self.stats.increment(Counter::RenderCalls);
        Ok(html.into_string())
    }
}
