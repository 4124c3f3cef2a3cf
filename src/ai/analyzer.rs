use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::ai::{
    client::{CompletionClient, OpenAiClient},
    config::{AgentConfig, AiConfig},
    errors::AiError,
    model::{
        AgentDecisions, AiAnalysis, ContentAnalysis, ImageAnalysis, Outcome, VideoAnalysis,
        identify_platform,
    },
    prompts::{SLOT_CONTENT, SLOT_DATA_SUMMARY, SLOT_IMAGES, SLOT_VIDEOS, fill},
};
use crate::extractor::{ImageRef, PageRecord, VideoRef};
use crate::scoring::{DataSummary, overall_score, priority_score, readability_score, recommendations};

const NO_IMAGES: &str = "No images to analyze";
const NO_VIDEOS: &str = "No videos to analyze";

#[derive(Debug, Serialize)]
struct ImageSummary<'a> {
    url: &'a str,
    alt_text: &'a str,
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct VideoSummary<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    platform: &'static str,
}

/// Runs the per-page analyses against a completion backend.
///
/// Each analysis fails on its own: a backend error becomes an
/// `Outcome::Failed` in that slot and the remaining analyses still run.
#[derive(Clone)]
pub struct AiAnalyzer {
    client: Arc<dyn CompletionClient>,
    config: AiConfig,
    agent: AgentConfig,
}

impl AiAnalyzer {
    pub fn new(client: Arc<dyn CompletionClient>, config: AiConfig, agent: AgentConfig) -> Self {
        Self {
            client,
            config,
            agent,
        }
    }

    /// Builds an analyzer backed by `OpenAiClient`, or `None` when no key is
    /// configured or analysis is switched off.
    pub fn from_config(config: &AiConfig, agent: &AgentConfig) -> Result<Option<Self>, AiError> {
        if !config.is_usable() {
            warn!("AI API key not provided or analysis disabled; AI features are off");
            return Ok(None);
        }
        let client = OpenAiClient::new(config)?;
        Ok(Some(Self::new(
            Arc::new(client),
            config.clone(),
            agent.clone(),
        )))
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enable_ai_analysis
    }

    #[instrument(skip_all, fields(url = %record.url))]
    pub async fn analyze(&self, record: &PageRecord) -> Result<AiAnalysis, AiError> {
        let mut analysis = AiAnalysis {
            content_analysis: None,
            image_analysis: None,
            video_analysis: None,
            agent_decisions: None,
            overall_score: 0.0,
        };

        if self.config.enable_content_summarization {
            analysis.content_analysis = Some(self.analyze_text(record.full_text()).await);
        }

        let images = record.images.as_deref().unwrap_or_default();
        if self.config.enable_image_analysis && images.len() >= self.agent.image_analysis_threshold {
            analysis.image_analysis = Some(self.analyze_images(images).await?);
        }

        let videos = record.videos.as_deref().unwrap_or_default();
        if self.config.enable_video_analysis && videos.len() >= self.agent.video_analysis_threshold {
            analysis.video_analysis = Some(self.analyze_videos(videos).await?);
        }

        if self.config.enable_decision_making {
            let has_analysis = analysis.content_analysis.is_some()
                || analysis.image_analysis.is_some()
                || analysis.video_analysis.is_some();
            let summary = DataSummary::from_record(record, has_analysis);
            analysis.agent_decisions = Some(self.make_decisions(&summary).await?);
        }

        let readability = analysis.content_analysis.as_ref().map(|content| {
            content
                .done()
                .and_then(|content| content.readability_score)
                .unwrap_or(0.0)
        });
        let priority = analysis.agent_decisions.as_ref().map(|decisions| {
            decisions
                .done()
                .map(|decisions| decisions.priority_score)
                .unwrap_or(0.0)
        });
        analysis.overall_score = overall_score(readability, priority);

        info!(overall_score = analysis.overall_score, "AI analysis completed");
        Ok(analysis)
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.client
            .complete(prompt, self.config.max_tokens, self.config.temperature)
            .await
    }

    async fn analyze_text(&self, full_text: &str) -> Outcome<ContentAnalysis> {
        let character_count = full_text.chars().count();
        if character_count < self.agent.min_content_chars {
            debug!(character_count, "text below analysis minimum");
            return Outcome::Done(ContentAnalysis::too_short());
        }

        let sample: String = full_text.chars().take(self.agent.content_sample_chars).collect();
        let prompt = fill(&self.config.prompts.content_analysis, SLOT_CONTENT, &sample);

        match self.complete(&prompt).await {
            Ok(summary) => Outcome::Done(ContentAnalysis {
                summary,
                word_count: Some(full_text.split_whitespace().count()),
                character_count: Some(character_count),
                readability_score: Some(readability_score(full_text)),
            }),
            Err(err) => {
                warn!("Text analysis failed: {}", err);
                Outcome::failed("Text analysis", err)
            }
        }
    }

    async fn analyze_images(&self, images: &[ImageRef]) -> Result<Outcome<ImageAnalysis>, AiError> {
        if images.is_empty() {
            return Ok(Outcome::Done(ImageAnalysis {
                analysis: NO_IMAGES.to_string(),
                total_images: 0,
                analyzed_images: 0,
            }));
        }

        let summary: Vec<ImageSummary<'_>> = images
            .iter()
            .take(self.agent.max_images_analyzed)
            .map(|img| ImageSummary {
                url: &img.url,
                alt_text: &img.alt,
                title: &img.title,
            })
            .collect();
        let prompt = fill(
            &self.config.prompts.image_analysis,
            SLOT_IMAGES,
            &serde_json::to_string_pretty(&summary)?,
        );

        Ok(match self.complete(&prompt).await {
            Ok(analysis) => Outcome::Done(ImageAnalysis {
                analysis,
                total_images: images.len(),
                analyzed_images: summary.len(),
            }),
            Err(err) => {
                warn!("Image analysis failed: {}", err);
                Outcome::failed("Image analysis", err)
            }
        })
    }

    async fn analyze_videos(&self, videos: &[VideoRef]) -> Result<Outcome<VideoAnalysis>, AiError> {
        if videos.is_empty() {
            return Ok(Outcome::Done(VideoAnalysis {
                analysis: NO_VIDEOS.to_string(),
                total_videos: 0,
                platforms: Vec::new(),
            }));
        }

        let summary: Vec<VideoSummary<'_>> = videos
            .iter()
            .map(|video| VideoSummary {
                url: video.url(),
                kind: video.kind(),
                platform: identify_platform(video.url()),
            })
            .collect();
        let prompt = fill(
            &self.config.prompts.video_analysis,
            SLOT_VIDEOS,
            &serde_json::to_string_pretty(&summary)?,
        );

        let mut platforms: Vec<String> = Vec::new();
        for entry in &summary {
            if !platforms.iter().any(|p| p == entry.platform) {
                platforms.push(entry.platform.to_string());
            }
        }

        Ok(match self.complete(&prompt).await {
            Ok(analysis) => Outcome::Done(VideoAnalysis {
                analysis,
                total_videos: videos.len(),
                platforms,
            }),
            Err(err) => {
                warn!("Video analysis failed: {}", err);
                Outcome::failed("Video analysis", err)
            }
        })
    }

    async fn make_decisions(&self, summary: &DataSummary) -> Result<Outcome<AgentDecisions>, AiError> {
        let prompt = fill(
            &self.config.prompts.decision_making,
            SLOT_DATA_SUMMARY,
            &serde_json::to_string_pretty(summary)?,
        );

        Ok(match self.complete(&prompt).await {
            Ok(decisions) => Outcome::Done(AgentDecisions {
                decisions,
                priority_score: priority_score(summary),
                recommended_actions: recommendations(summary),
            }),
            Err(err) => {
                warn!("Decision making failed: {}", err);
                Outcome::failed("Decision making", err)
            }
        })
    }
}
