use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::extractor::model::{ImageRef, LinkRef, VideoRef};
use crate::extractor::options::ExtractionConfig;
use crate::extractor::text::element_text;

static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static VIDEO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("video").unwrap());
static SOURCE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("source").unwrap());
static IFRAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("iframe").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Resolves `reference` against `base` when resolution is enabled, otherwise
/// (or when joining fails) hands it back untouched.
pub fn resolve_url(base: &Url, reference: &str, config: &ExtractionConfig) -> String {
    if !config.resolve_relative_urls {
        return reference.to_string();
    }
    base.join(reference)
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

fn attr_or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub fn extract_images(document: &Html, base: &Url, config: &ExtractionConfig) -> Vec<ImageRef> {
    document
        .select(&IMAGE)
        .filter_map(|img| {
            let attrs = img.value();
            let src = attrs.attr("src").filter(|src| !src.is_empty())?;
            let (width, height) = if config.include_image_dimensions {
                (
                    Some(attr_or_empty(attrs.attr("width"))),
                    Some(attr_or_empty(attrs.attr("height"))),
                )
            } else {
                (None, None)
            };

            Some(ImageRef {
                url: resolve_url(base, src, config),
                alt: attr_or_empty(attrs.attr("alt")),
                title: attr_or_empty(attrs.attr("title")),
                width,
                height,
            })
        })
        .collect()
}

/// `<video>` elements followed by their `<source>` children, in document
/// order, then embedded players recognised by iframe `src`.
pub fn extract_videos(document: &Html, base: &Url, config: &ExtractionConfig) -> Vec<VideoRef> {
    let mut videos = Vec::new();

    for video in document.select(&VIDEO) {
        let attrs = video.value();
        if let Some(src) = attrs.attr("src").filter(|src| !src.is_empty()) {
            videos.push(VideoRef::Video {
                url: resolve_url(base, src, config),
                controls: attr_or_empty(attrs.attr("controls")),
                autoplay: attr_or_empty(attrs.attr("autoplay")),
                poster: attr_or_empty(attrs.attr("poster")),
            });
        }

        for source in video.select(&SOURCE) {
            let attrs = source.value();
            if let Some(src) = attrs.attr("src").filter(|src| !src.is_empty()) {
                videos.push(VideoRef::VideoSource {
                    url: resolve_url(base, src, config),
                    type_attr: attr_or_empty(attrs.attr("type")),
                });
            }
        }
    }

    if config.include_embedded_videos {
        for iframe in document.select(&IFRAME) {
            let attrs = iframe.value();
            let src = attrs.attr("src").unwrap_or_default();
            let lowered = src.to_lowercase();
            if config
                .video_platforms
                .iter()
                .any(|platform| lowered.contains(platform.as_str()))
            {
                videos.push(VideoRef::EmbeddedVideo {
                    url: src.to_string(),
                    width: attr_or_empty(attrs.attr("width")),
                    height: attr_or_empty(attrs.attr("height")),
                });
            }
        }
    }

    videos
}

pub fn extract_links(document: &Html, base: &Url, config: &ExtractionConfig) -> Vec<LinkRef> {
    document
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let attrs = anchor.value();
            let href = attrs.attr("href").filter(|href| !href.is_empty())?;
            let text = element_text(anchor);
            if config.exclude_empty_content && text.is_empty() {
                return None;
            }

            Some(LinkRef {
                url: resolve_url(base, href, config),
                text,
                title: attr_or_empty(attrs.attr("title")),
                target: attr_or_empty(attrs.attr("target")),
            })
        })
        .collect()
}
