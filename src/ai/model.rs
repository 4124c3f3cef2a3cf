use serde::{Deserialize, Serialize};

use crate::extractor::options::DEFAULT_VIDEO_PLATFORMS;

pub const UNKNOWN_PLATFORM: &str = "unknown";
pub const CONTENT_TOO_SHORT: &str = "Content too short for analysis";

/// Either a finished analysis or the `{error}` object that replaced it.
///
/// `Failed` is listed first so an object carrying `error` never
/// deserializes as a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Failed { error: String },
    Done(T),
}

impl<T> Outcome<T> {
    pub fn failed(context: &str, err: impl std::fmt::Display) -> Self {
        Outcome::Failed {
            error: format!("{context} failed: {err}"),
        }
    }

    pub fn done(&self) -> Option<&T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<Outcome<ContentAnalysis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<Outcome<ImageAnalysis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_analysis: Option<Outcome<VideoAnalysis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_decisions: Option<Outcome<AgentDecisions>>,
    pub overall_score: f64,
}

/// The counts are absent when the text was too short to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability_score: Option<f64>,
}

impl ContentAnalysis {
    pub fn too_short() -> Self {
        Self {
            summary: CONTENT_TOO_SHORT.to_string(),
            word_count: None,
            character_count: None,
            readability_score: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub analysis: String,
    pub total_images: usize,
    pub analyzed_images: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub analysis: String,
    pub total_videos: usize,
    /// Distinct platforms in first-seen order.
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDecisions {
    pub decisions: String,
    pub priority_score: f64,
    pub recommended_actions: Vec<String>,
}

/// Names the hosting platform of a video URL by substring match.
pub fn identify_platform(url: &str) -> &'static str {
    let url = url.to_lowercase();
    DEFAULT_VIDEO_PLATFORMS
        .iter()
        .find(|platform| url.contains(*platform))
        .copied()
        .unwrap_or(UNKNOWN_PLATFORM)
}
