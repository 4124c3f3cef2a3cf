use serde::{Deserialize, Serialize};

pub const SLOT_CONTENT: &str = "content";
pub const SLOT_IMAGES: &str = "images";
pub const SLOT_VIDEOS: &str = "videos";
pub const SLOT_DATA_SUMMARY: &str = "data_summary";

const CONTENT_ANALYSIS: &str = "Analyze the following web content and provide:
1. Main topic/theme
2. Key insights (3-5 bullet points)
3. Content quality score (1-10)
4. Target audience
5. Content type classification

Content: {content}";

const IMAGE_ANALYSIS: &str = "Analyze the following images from a webpage and provide:
1. Overall visual theme
2. Image types and purposes
3. Quality assessment
4. Relevance to content

Images: {images}";

const VIDEO_ANALYSIS: &str = "Analyze the following videos from a webpage and provide:
1. Video content types
2. Platform distribution
3. Relevance assessment
4. Engagement potential

Videos: {videos}";

const DECISION_MAKING: &str = "Based on the scraped data, make decisions about:
1. Should this content be prioritized? (Yes/No and why)
2. What follow-up actions are recommended?
3. Content classification and tagging suggestions
4. Data extraction quality score (1-10)

Data summary: {data_summary}";

/// One template per analysis. Each may reference its slot as `{slot}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptTemplates {
    pub content_analysis: String,
    pub image_analysis: String,
    pub video_analysis: String,
    pub decision_making: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            content_analysis: CONTENT_ANALYSIS.to_string(),
            image_analysis: IMAGE_ANALYSIS.to_string(),
            video_analysis: VIDEO_ANALYSIS.to_string(),
            decision_making: DECISION_MAKING.to_string(),
        }
    }
}

/// Substitutes every `{slot}` in `template` with `value`. Other braces are
/// left alone, so templates may contain literal JSON.
pub fn fill(template: &str, slot: &str, value: &str) -> String {
    template.replace(&format!("{{{slot}}}"), value)
}
