pub mod media;
pub mod model;
pub mod options;
pub mod text;

#[cfg(test)]
mod tests;

pub use model::{ImageRef, LinkRef, ListBlock, ListKind, PageRecord, TextContent, VideoRef};
pub use options::ExtractionConfig;

use scraper::Html;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Parses `html` and runs every enabled pass.
///
/// `page_url` is recorded on the result; relative references are resolved
/// against `base_url`, which is usually the post-redirect URL.
pub fn extract(
    html: &str,
    page_url: &str,
    base_url: &str,
    config: &ExtractionConfig,
) -> Result<PageRecord, ExtractionError> {
    let base = Url::parse(base_url).map_err(|source| ExtractionError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;
    let document = Html::parse_document(html);
    Ok(extract_document(&document, page_url, &base, config))
}

/// Missing elements become empty strings and collections; nothing in here
/// fails.
pub fn extract_document(
    document: &Html,
    page_url: &str,
    base: &Url,
    config: &ExtractionConfig,
) -> PageRecord {
    let mut record = PageRecord::new(page_url);

    if config.extract_text {
        record.title = Some(text::extract_title(document));
        record.text_content = Some(text::extract_text_content(document, config));
    }
    if config.extract_metadata {
        record.metadata = Some(text::extract_metadata(document));
    }
    if config.extract_images {
        record.images = Some(media::extract_images(document, base, config));
    }
    if config.extract_videos {
        record.videos = Some(media::extract_videos(document, base, config));
    }
    if config.extract_links {
        record.links = Some(media::extract_links(document, base, config));
    }

    debug!(
        url = page_url,
        images = record.image_count(),
        videos = record.video_count(),
        links = record.link_count(),
        "extracted page record"
    );

    record
}
