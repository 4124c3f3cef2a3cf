use serde::{Deserialize, Serialize};

pub const DEFAULT_VIDEO_PLATFORMS: [&str; 4] = ["youtube", "vimeo", "dailymotion", "twitch"];

/// Toggles and thresholds for the extraction passes.
///
/// Every field has a default, so a partially written config file still
/// produces a complete value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractionConfig {
    /// Gates both the title and the text content passes.
    pub extract_text: bool,
    pub extract_images: bool,
    pub extract_videos: bool,
    pub extract_links: bool,
    pub extract_metadata: bool,
    /// Collapse whitespace runs in the full text to single spaces.
    pub clean_text: bool,
    pub resolve_relative_urls: bool,
    /// Paragraphs shorter than this many characters are dropped.
    pub min_text_length: usize,
    /// Drop links whose anchor text is empty.
    pub exclude_empty_content: bool,
    pub include_embedded_videos: bool,
    /// Lowercase substrings matched against iframe `src`.
    pub video_platforms: Vec<String>,
    pub include_image_dimensions: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            extract_text: true,
            extract_images: true,
            extract_videos: true,
            extract_links: true,
            extract_metadata: true,
            clean_text: true,
            resolve_relative_urls: true,
            min_text_length: 10,
            exclude_empty_content: true,
            include_embedded_videos: true,
            video_platforms: DEFAULT_VIDEO_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            include_image_dimensions: true,
        }
    }
}
