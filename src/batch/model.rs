use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::ai::{AiAnalysis, AiError, Outcome};
use crate::extractor::{ExtractionError, PageRecord, model::timestamp};
use crate::fetcher::FetchError;
use crate::scoring::{
    self, ContentRichness, ExtractionCompleteness, SeoAnalysis, content_richness,
    data_quality_score, extraction_completeness,
};

/// Why a single URL produced no record.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Failures while wiring up a coordinator from configuration.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to build fetcher: {0}")]
    Fetcher(#[from] FetchError),

    #[error("failed to build AI client: {0}")]
    Ai(#[from] AiError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    #[serde(with = "timestamp")]
    pub processing_timestamp: NaiveDateTime,
    pub data_quality_score: f64,
    pub content_richness: ContentRichness,
    pub extraction_completeness: ExtractionCompleteness,
    pub ai_analysis_available: bool,
}

/// A record plus everything derived from it. Extracted fields are never
/// rewritten; annotations only add top-level keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: PageRecord,
    pub agent_metadata: AgentMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<Outcome<AiAnalysis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_analysis: Option<SeoAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_to_file: Option<String>,
}

impl AnnotatedRecord {
    pub fn new(record: PageRecord, ai_analysis: Option<Outcome<AiAnalysis>>, with_seo: bool) -> Self {
        let agent_metadata = AgentMetadata {
            processing_timestamp: record.scraped_at,
            data_quality_score: data_quality_score(&record),
            content_richness: content_richness(&record),
            extraction_completeness: extraction_completeness(&record),
            ai_analysis_available: ai_analysis.as_ref().is_some_and(|a| !a.is_failed()),
        };
        let seo_analysis = with_seo.then(|| scoring::seo::analyze(&record));

        Self {
            record,
            agent_metadata,
            ai_analysis,
            seo_analysis,
            saved_to_file: None,
        }
    }
}

/// One slot in a batch: the annotated record, or the URL and why it failed.
///
/// `Failed` comes first so that `{url, error}` objects are recognised
/// before the record shape is tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Failed { url: String, error: String },
    Annotated(Box<AnnotatedRecord>),
}

impl BatchEntry {
    pub fn url(&self) -> &str {
        match self {
            BatchEntry::Failed { url, .. } => url,
            BatchEntry::Annotated(annotated) => &annotated.record.url,
        }
    }

    pub fn annotated(&self) -> Option<&AnnotatedRecord> {
        match self {
            BatchEntry::Annotated(annotated) => Some(annotated),
            BatchEntry::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchEntry::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_processed: usize,
    pub successful_extractions: usize,
    pub total_images_found: usize,
    pub total_videos_found: usize,
    pub total_links_found: usize,
    /// Mean over successful entries only; 0 when none succeeded.
    pub average_quality_score: f64,
    pub ai_analysis_performed: usize,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let successes: Vec<&AnnotatedRecord> =
            entries.iter().filter_map(BatchEntry::annotated).collect();

        let average_quality_score = if successes.is_empty() {
            0.0
        } else {
            let total: f64 = successes
                .iter()
                .map(|a| a.agent_metadata.data_quality_score)
                .sum();
            scoring::round2(total / successes.len() as f64)
        };

        Self {
            total_processed: entries.len(),
            successful_extractions: successes.len(),
            total_images_found: successes.iter().map(|a| a.record.image_count()).sum(),
            total_videos_found: successes.iter().map(|a| a.record.video_count()).sum(),
            total_links_found: successes.iter().map(|a| a.record.link_count()).sum(),
            average_quality_score,
            ai_analysis_performed: successes
                .iter()
                .filter(|a| a.agent_metadata.ai_analysis_available)
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub run_id: Uuid,
    pub results: Vec<BatchEntry>,
    pub batch_summary: BatchSummary,
    pub processed_count: usize,
    pub success_count: usize,
    /// Set when the run stopped before every URL was attempted.
    pub cancelled: bool,
}

impl BatchResult {
    pub fn new(run_id: Uuid, results: Vec<BatchEntry>, cancelled: bool) -> Self {
        let batch_summary = BatchSummary::from_entries(&results);
        Self {
            run_id,
            processed_count: batch_summary.total_processed,
            success_count: batch_summary.successful_extractions,
            batch_summary,
            results,
            cancelled,
        }
    }
}
