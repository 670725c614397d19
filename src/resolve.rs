//! Option resolution.
//!
//! Every key is resolved independently. The first layer that sets it wins:
//!
//! ```text
//! call-site options  >  field defaults  >  template defaults  >  global defaults
//! ```
//!
//! Template and field layers are selected by the render context; a context
//! part that is empty, or has no entry in its map, contributes nothing.
//! Global defaults always provide a value, so the result is fully concrete.

use crate::asset::ContextKey;
use crate::config::{ConfigLayers, ContextDefaults};
use crate::options::{CollectionOptions, PartialOptions, RenderOptions};

/// Merge the template, field and call-site layers for a context, without
/// filling in global defaults.
pub fn merge_layers(
    call: &PartialOptions,
    ctx: &ContextKey,
    layers: &ConfigLayers,
) -> PartialOptions {
    let mut merged = PartialOptions::default();
    if let Some(template) = lookup(&layers.templates, &ctx.template) {
        merged.overlay(template);
    }
    if let Some(field) = lookup(&layers.fields, &ctx.field) {
        merged.overlay(field);
    }
    merged.overlay(call);
    merged
}

fn lookup<'a>(map: &'a ContextDefaults, name: &str) -> Option<&'a PartialOptions> {
    if name.is_empty() {
        None
    } else {
        map.get(name)
    }
}

/// Resolve the effective per-image options.
pub fn resolve(call: &PartialOptions, ctx: &ContextKey, layers: &ConfigLayers) -> RenderOptions {
    let merged = merge_layers(call, ctx, layers);
    let global = &layers.global;

    RenderOptions {
        alt: merged.alt.unwrap_or_else(|| global.alt.clone()),
        class: merged.class.unwrap_or_else(|| global.image_class.clone()),
        picture_class: merged
            .picture_class
            .unwrap_or_else(|| global.picture_class.clone()),
        lazy: merged.lazy.unwrap_or(global.lazy),
        sizes: merged.sizes.unwrap_or_else(|| global.sizes.clone()),
        breakpoints: merged
            .breakpoints
            .unwrap_or_else(|| global.breakpoints.clone()),
        fetch_priority: merged.fetch_priority.unwrap_or(global.fetch_priority),
        figure: merged.figure.unwrap_or(global.figure),
        figure_class: merged
            .figure_class
            .unwrap_or_else(|| global.figure_class.clone()),
        figcaption_class: merged
            .figcaption_class
            .unwrap_or_else(|| global.figcaption_class.clone()),
        figcaption_field: merged
            .figcaption_field
            .unwrap_or_else(|| global.figcaption_field.clone()),
        figcaption_fallback: merged
            .figcaption_fallback
            .unwrap_or(global.figcaption_fallback),
    }
}

/// Resolve the wrapper settings of the "render all" entry point.
pub fn resolve_collection(
    call: &PartialOptions,
    ctx: &ContextKey,
    layers: &ConfigLayers,
) -> CollectionOptions {
    let merged = merge_layers(call, ctx, layers);
    let global = &layers.global;

    CollectionOptions {
        wrapper_tag: merged
            .wrapper
            .unwrap_or_else(|| global.wrapper_tag.clone()),
        wrapper_class: merged
            .wrapper_class
            .unwrap_or_else(|| global.wrapper_class.clone()),
        item_class: merged
            .item_class
            .unwrap_or_else(|| global.item_class.clone()),
    }
}
