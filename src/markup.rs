//! HTML assembly.
//!
//! Uses [maud](https://maud.lambda.xyz/) for `<picture>` and `<figure>`, so
//! every interpolated value (URLs, alt text, classes, captions) is escaped
//! automatically. The collection wrapper is the exception: its element name
//! is configuration, which maud cannot express as a literal, so it is
//! validated with [`is_element_name`] and written by hand.
//!
//! ## Output
//!
//! ```text
//! <figure class="figure">                          (only with figure = true)
//!   <picture class="...">
//!     <source srcset="a.400x0.webp 400w, a.webp 2000w" type="image/webp" sizes="...">
//!     <img src="a.jpg" srcset="..." sizes="..." alt="..." width="2000" height="1500"
//!          loading="lazy" decoding="async" fetchpriority="high" class="...">
//!   </picture>
//!   <figcaption class="figure__caption">...</figcaption>   (only with a caption)
//! </figure>
//! ```
//!
//! The real output has no indentation; maud writes compact markup.

use crate::asset::ImageAsset;
use crate::options::{CollectionOptions, RenderOptions};
use crate::srcset::Srcsets;
use maud::{Markup, PreEscaped, html};
use tracing::warn;

/// Trimmed value, or `None` when nothing is left.
fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    html! { (value) }.into_string()
}

/// Whether `name` is safe to emit as an element name.
pub fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Alt text: explicit option, then the image description, then the file name.
pub fn resolve_alt(image: &ImageAsset, options: &RenderOptions) -> String {
    [Some(options.alt.as_str()), image.description()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(image.basename.as_str())
        .to_string()
}

/// Render the `<picture>` element for one image.
///
/// With `debug`, the `<img>` carries the breakpoints it was rendered with.
pub fn render_picture(
    image: &ImageAsset,
    options: &RenderOptions,
    srcsets: &Srcsets,
    alt: &str,
    debug: bool,
) -> Markup {
    let sizes = options.sizes.as_str();
    html! {
        picture class=[non_empty(&options.picture_class)] {
            source srcset=(srcsets.webp.to_attr()) type="image/webp" sizes=(sizes);
            img src=(image.url)
                srcset=(srcsets.fallback.to_attr())
                sizes=(sizes)
                alt=(alt)
                width=(image.width)
                height=(image.height)
                loading=[options.lazy.then_some("lazy")]
                decoding="async"
                fetchpriority=[options.fetch_priority.as_attr()]
                data-picture=[debug.then_some("1")]
                data-picture-breakpoints=[debug.then(|| options.breakpoints.to_csv())]
                class=[non_empty(&options.class)];
        }
    }
}

/// Wrap a rendered picture in `<figure>`, adding a `<figcaption>` only when
/// `caption` is non-empty.
pub fn render_figure(
    picture: Markup,
    caption: &str,
    figure_class: &str,
    figcaption_class: &str,
) -> Markup {
    html! {
        figure class=[non_empty(figure_class)] {
            (picture)
            @if !caption.is_empty() {
                figcaption class=[non_empty(figcaption_class)] { (caption) }
            }
        }
    }
}

/// HTML comment preceding an image in debug mode.
pub fn debug_comment(options: &RenderOptions) -> Markup {
    let structure = if options.figure { "figure + picture" } else { "picture" };
    PreEscaped(format!(
        "<!-- picture-press: {structure}/webp + fallback (breakpoints={}) -->\n",
        options.breakpoints.to_csv()
    ))
}

/// Join rendered items, optionally wrapping each in a classed `<div>` and
/// all of them in a wrapper element.
///
/// No items means no output at all, not even an empty wrapper. An empty or
/// invalid wrapper tag leaves the joined items unwrapped.
pub fn render_collection(items: &[String], options: &CollectionOptions) -> String {
    if items.is_empty() {
        return String::new();
    }

    let body = items
        .iter()
        .map(|item| match non_empty(&options.item_class) {
            Some(class) => html! { div class=(class) { (PreEscaped(item)) } }.into_string(),
            None => item.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let tag = options.wrapper_tag.trim();
    if tag.is_empty() {
        return body;
    }
    if !is_element_name(tag) {
        warn!(wrapper = tag, "invalid wrapper element name, rendering items unwrapped");
        return body;
    }

    let class_attr = non_empty(&options.wrapper_class)
        .map(|class| format!(r#" class="{}""#, escape_attr(class)))
        .unwrap_or_default();
    format!("<{tag}{class_attr}>\n{body}\n</{tag}>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoints::BreakpointSet;
    use crate::config::ConfigLayers;
    use crate::options::{CaptionFallback, FetchPriority};
    use crate::srcset::{Srcset, SrcsetEntry};

    fn options() -> RenderOptions {
        RenderOptions {
            alt: String::new(),
            class: String::new(),
            picture_class: String::new(),
            lazy: false,
            sizes: "100vw".into(),
            breakpoints: BreakpointSet::from_widths([400]),
            fetch_priority: FetchPriority::Unset,
            figure: false,
            figure_class: "figure".into(),
            figcaption_class: "figure__caption".into(),
            figcaption_field: "description".into(),
            figcaption_fallback: CaptionFallback::None,
        }
    }

    fn image() -> ImageAsset {
        ImageAsset::new("/f/a.jpg", 800, 600)
    }

    fn srcsets() -> Srcsets {
        let mut webp = Srcset::default();
        webp.push(SrcsetEntry::new("/f/a.400x0.webp", 400));
        webp.push(SrcsetEntry::new("/f/a.webp", 800));
        let mut fallback = Srcset::default();
        fallback.push(SrcsetEntry::new("/f/a.400x0.jpg", 400));
        fallback.push(SrcsetEntry::new("/f/a.jpg", 800));
        Srcsets { webp, fallback }
    }

    fn collection(tag: &str, wrapper_class: &str, item_class: &str) -> CollectionOptions {
        CollectionOptions {
            wrapper_tag: tag.into(),
            wrapper_class: wrapper_class.into(),
            item_class: item_class.into(),
        }
    }

    #[test]
    fn picture_has_webp_source_and_img() {
        let html = render_picture(&image(), &options(), &srcsets(), "A", false).into_string();
        assert_eq!(
            html,
            concat!(
                r#"<picture>"#,
                r#"<source srcset="/f/a.400x0.webp 400w, /f/a.webp 800w" type="image/webp" sizes="100vw">"#,
                r#"<img src="/f/a.jpg" srcset="/f/a.400x0.jpg 400w, /f/a.jpg 800w" sizes="100vw" alt="A" width="800" height="600" decoding="async">"#,
                r#"</picture>"#,
            )
        );
    }

    #[test]
    fn optional_attributes_follow_options() {
        let opts = RenderOptions {
            lazy: true,
            fetch_priority: FetchPriority::High,
            class: " hero ".into(),
            picture_class: "pic".into(),
            ..options()
        };
        let html = render_picture(&image(), &opts, &srcsets(), "A", false).into_string();
        assert!(html.contains(r#"<picture class="pic">"#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains(r#"fetchpriority="high""#));
        assert!(html.contains(r#"class="hero""#));
        assert!(!html.contains("data-picture"));
    }

    #[test]
    fn debug_adds_data_attributes() {
        let html = render_picture(&image(), &options(), &srcsets(), "A", true).into_string();
        assert!(html.contains(r#"data-picture="1""#));
        assert!(html.contains(r#"data-picture-breakpoints="400""#));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let html = render_picture(
            &image(),
            &options(),
            &srcsets(),
            r#"Fish & "chips" <b>"#,
            false,
        )
        .into_string();
        assert!(html.contains(r#"alt="Fish &amp; &quot;chips&quot; &lt;b&gt;""#));
    }

    #[test]
    fn alt_prefers_option_then_description_then_basename() {
        let described = image().with_field("description", "Dunes");
        let with_alt = RenderOptions {
            alt: "Explicit".into(),
            ..options()
        };
        assert_eq!(resolve_alt(&described, &with_alt), "Explicit");
        assert_eq!(resolve_alt(&described, &options()), "Dunes");
        assert_eq!(resolve_alt(&image(), &options()), "a.jpg");
    }

    #[test]
    fn figure_includes_caption() {
        let picture = html! { picture {} };
        let html = render_figure(picture, "Dusk", "figure", "cap").into_string();
        assert_eq!(
            html,
            r#"<figure class="figure"><picture></picture><figcaption class="cap">Dusk</figcaption></figure>"#
        );
    }

    #[test]
    fn figure_omits_empty_caption_and_class() {
        let picture = html! { picture {} };
        let html = render_figure(picture, "", "", "cap").into_string();
        assert_eq!(html, "<figure><picture></picture></figure>");
    }

    #[test]
    fn caption_is_escaped() {
        let html = render_figure(html! {}, "<script>", "", "").into_string();
        assert!(html.contains("<figcaption>&lt;script&gt;</figcaption>"));
    }

    #[test]
    fn debug_comment_names_structure() {
        let opts = RenderOptions {
            figure: true,
            ..options()
        };
        assert_eq!(
            debug_comment(&opts).into_string(),
            "<!-- picture-press: figure + picture/webp + fallback (breakpoints=400) -->\n"
        );
    }

    #[test]
    fn collection_wraps_items() {
        let items = vec!["<p>1</p>".to_string(), "<p>2</p>".to_string()];
        let html = render_collection(&items, &collection("div", "gallery", "item"));
        assert_eq!(
            html,
            "<div class=\"gallery\">\n<div class=\"item\"><p>1</p></div>\n<div class=\"item\"><p>2</p></div>\n</div>"
        );
    }

    #[test]
    fn collection_without_item_class_joins_raw_items() {
        let items = vec!["<p>1</p>".to_string(), "<p>2</p>".to_string()];
        let html = render_collection(&items, &collection("ul", "", ""));
        assert_eq!(html, "<ul>\n<p>1</p>\n<p>2</p>\n</ul>");
    }

    #[test]
    fn collection_without_wrapper_still_returns_items() {
        let items = vec!["<p>1</p>".to_string()];
        let html = render_collection(&items, &collection("", "gallery", "item"));
        assert_eq!(html, "<div class=\"item\"><p>1</p></div>");
    }

    #[test]
    fn empty_collection_renders_nothing() {
        assert_eq!(render_collection(&[], &collection("div", "gallery", "item")), "");
    }

    #[test]
    fn invalid_wrapper_tag_is_dropped() {
        let items = vec!["<p>1</p>".to_string()];
        let html = render_collection(&items, &collection("div onload=x", "g", ""));
        assert_eq!(html, "<p>1</p>");
    }

    #[test]
    fn wrapper_class_is_escaped() {
        let items = vec!["x".to_string()];
        let html = render_collection(&items, &collection("div", r#"a"b"#, ""));
        assert_eq!(html, "<div class=\"a&quot;b\">\nx\n</div>");
    }

    #[test]
    fn element_name_validation() {
        assert!(is_element_name("div"));
        assert!(is_element_name("my-gallery"));
        assert!(is_element_name("h2"));
        assert!(!is_element_name(""));
        assert!(!is_element_name("2col"));
        assert!(!is_element_name("div class"));
        assert!(!is_element_name("<div>"));
    }

    #[test]
    fn stock_defaults_render_lazy_picture() {
        let opts = crate::resolve::resolve(
            &Default::default(),
            &Default::default(),
            &ConfigLayers::default(),
        );
        let html = render_picture(&image(), &opts, &srcsets(), "A", false).into_string();
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains(r#"sizes="(max-width: 768px) 100vw, (max-width: 1200px) 50vw, 33vw""#));
    }
}
