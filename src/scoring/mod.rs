//! Deterministic grading of extracted pages.
//!
//! Everything here is a pure function of a `PageRecord` (or counts derived
//! from one), so scores can be recomputed from a saved record alone.

pub mod priority;
pub mod quality;
pub mod seo;

pub use priority::{DataSummary, overall_score, priority_score, recommendations};
pub use quality::{
    ContentRichness, ExtractionCompleteness, content_richness, data_quality_score,
    extraction_completeness, readability_score,
};
pub use seo::{SeoAnalysis, seo_score};

/// Rounds to two decimal places.
///
/// Goes through the exact decimal expansion, so `2.675` (stored just below
/// the tie) becomes `2.67` and exact ties such as `0.125` round to even.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
