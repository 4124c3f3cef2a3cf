use serde::{Deserialize, Serialize};

use crate::ai::prompts::PromptTemplates;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection and feature settings for the completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiConfig {
    /// Never written back out; comes from `OPENAI_API_KEY` or the config file.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub enable_ai_analysis: bool,
    pub enable_content_summarization: bool,
    pub enable_image_analysis: bool,
    pub enable_video_analysis: bool,
    pub enable_decision_making: bool,
    pub prompts: PromptTemplates,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            temperature: 0.3,
            timeout_secs: 60,
            enable_ai_analysis: true,
            enable_content_summarization: true,
            enable_image_analysis: true,
            enable_video_analysis: true,
            enable_decision_making: true,
            prompts: PromptTemplates::default(),
        }
    }
}

impl AiConfig {
    /// True when a non-blank key is set and analysis is switched on.
    pub fn is_usable(&self) -> bool {
        self.enable_ai_analysis
            && self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Thresholds that decide which analyses run for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentConfig {
    pub image_analysis_threshold: usize,
    pub video_analysis_threshold: usize,
    pub max_images_analyzed: usize,
    pub content_sample_chars: usize,
    pub min_content_chars: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            image_analysis_threshold: 5,
            video_analysis_threshold: 3,
            max_images_analyzed: 10,
            content_sample_chars: 3000,
            min_content_chars: 100,
        }
    }
}
