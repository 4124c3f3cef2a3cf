//! On-page SEO checks: title and description length, a single `h1`, image
//! alt coverage and body length, each worth 20 of 100 points.

use serde::{Deserialize, Serialize};

use crate::extractor::PageRecord;
use crate::scoring::round2;

const TITLE_OPTIMAL: std::ops::RangeInclusive<usize> = 50..=60;
const DESCRIPTION_OPTIMAL: std::ops::RangeInclusive<usize> = 150..=160;
const MIN_BODY_CHARS: usize = 300;
const CHECK_POINTS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysis {
    pub title_analysis: TitleAnalysis,
    pub meta_description: DescriptionAnalysis,
    pub heading_structure: HeadingStructure,
    pub image_alt_texts: AltTextCoverage,
    pub seo_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAnalysis {
    pub length: usize,
    pub optimal_length: bool,
    /// No keyword list is configured, so any non-blank title counts.
    pub contains_keywords: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionAnalysis {
    pub length: usize,
    pub optimal_length: bool,
    pub present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStructure {
    pub h1_count: usize,
    pub has_single_h1: bool,
    /// Proper hierarchy means exactly one `h1`; lower levels are not checked.
    pub heading_hierarchy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltTextCoverage {
    pub total_images: usize,
    pub images_with_alt: usize,
    /// Fraction in [0, 1]; 0 when the page has no images.
    pub alt_coverage: f64,
}

pub fn analyze(record: &PageRecord) -> SeoAnalysis {
    let title_len = record.title().chars().count();
    let description = record.metadata_value("description").unwrap_or_default();
    let description_len = description.chars().count();
    let h1_count = h1_count(record);
    let (total_images, images_with_alt) = alt_counts(record);

    SeoAnalysis {
        title_analysis: TitleAnalysis {
            length: title_len,
            optimal_length: TITLE_OPTIMAL.contains(&title_len),
            contains_keywords: !record.title().trim().is_empty(),
        },
        meta_description: DescriptionAnalysis {
            length: description_len,
            optimal_length: DESCRIPTION_OPTIMAL.contains(&description_len),
            present: !description.is_empty(),
        },
        heading_structure: HeadingStructure {
            h1_count,
            has_single_h1: h1_count == 1,
            heading_hierarchy: h1_count == 1,
        },
        image_alt_texts: AltTextCoverage {
            total_images,
            images_with_alt,
            alt_coverage: if total_images > 0 {
                images_with_alt as f64 / total_images as f64
            } else {
                0.0
            },
        },
        seo_score: seo_score(record),
    }
}

pub fn seo_score(record: &PageRecord) -> f64 {
    let mut score = 0.0;

    if TITLE_OPTIMAL.contains(&record.title().chars().count()) {
        score += CHECK_POINTS;
    }

    if let Some(description) = record.metadata_value("description")
        && !description.is_empty()
        && DESCRIPTION_OPTIMAL.contains(&description.chars().count())
    {
        score += CHECK_POINTS;
    }

    if h1_count(record) == 1 {
        score += CHECK_POINTS;
    }

    let (total_images, images_with_alt) = alt_counts(record);
    if total_images > 0 {
        score += CHECK_POINTS * (images_with_alt as f64 / total_images as f64);
    }

    if record.full_text().chars().count() > MIN_BODY_CHARS {
        score += CHECK_POINTS;
    }

    round2(score)
}

fn h1_count(record: &PageRecord) -> usize {
    record
        .headings()
        .and_then(|headings| headings.get("h1"))
        .map_or(0, Vec::len)
}

fn alt_counts(record: &PageRecord) -> (usize, usize) {
    let images = record.images.as_deref().unwrap_or_default();
    let with_alt = images.iter().filter(|img| !img.alt.is_empty()).count();
    (images.len(), with_alt)
}
