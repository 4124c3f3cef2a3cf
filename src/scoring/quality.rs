use serde::{Deserialize, Serialize};

use crate::extractor::PageRecord;
use crate::scoring::round2;

const MAX_QUALITY_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentRichness {
    Minimal,
    Moderate,
    Rich,
    VeryRich,
}

impl ContentRichness {
    pub fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Moderate => "Moderate",
            Self::Rich => "Rich",
            Self::VeryRich => "Very Rich",
        }
    }
}

/// Which parts of a record came back non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionCompleteness {
    pub title_extracted: bool,
    pub text_extracted: bool,
    pub images_extracted: bool,
    pub videos_extracted: bool,
    pub links_extracted: bool,
    pub metadata_extracted: bool,
}

/// 0–10 score built from fixed bonuses for each kind of content present.
pub fn data_quality_score(record: &PageRecord) -> f64 {
    let mut score = 0.0;

    if !record.title().is_empty() {
        score += 1.0;
    }

    let text_len = record.full_text().chars().count();
    if text_len > 100 {
        score += 2.0;
    } else if text_len > 50 {
        score += 1.0;
    }

    if let Some(text) = &record.text_content {
        if !text.headings.is_empty() {
            score += 1.0;
        }
        if !text.paragraphs.is_empty() {
            score += 1.0;
        }
    }

    if record.image_count() > 0 {
        score += 1.5;
    }
    if record.video_count() > 0 {
        score += 1.5;
    }
    if record.link_count() > 0 {
        score += 1.0;
    }
    if record.metadata.as_ref().is_some_and(|m| !m.is_empty()) {
        score += 1.0;
    }

    round2(score / MAX_QUALITY_SCORE * 10.0)
}

pub fn content_richness(record: &PageRecord) -> ContentRichness {
    richness_for(
        record.full_text().chars().count(),
        record.image_count(),
        record.video_count(),
    )
}

pub fn richness_for(text_len: usize, image_count: usize, video_count: usize) -> ContentRichness {
    let mut points = 0;

    points += match text_len {
        len if len > 1000 => 3,
        len if len > 500 => 2,
        len if len > 100 => 1,
        _ => 0,
    };
    points += match image_count {
        count if count > 5 => 2,
        count if count > 0 => 1,
        _ => 0,
    };
    if video_count > 0 {
        points += 2;
    }

    match points {
        p if p >= 6 => ContentRichness::VeryRich,
        p if p >= 4 => ContentRichness::Rich,
        p if p >= 2 => ContentRichness::Moderate,
        _ => ContentRichness::Minimal,
    }
}

pub fn extraction_completeness(record: &PageRecord) -> ExtractionCompleteness {
    ExtractionCompleteness {
        title_extracted: !record.title().is_empty(),
        text_extracted: !record.full_text().is_empty(),
        images_extracted: record.image_count() > 0,
        videos_extracted: record.video_count() > 0,
        links_extracted: record.link_count() > 0,
        metadata_extracted: record.metadata.as_ref().is_some_and(|m| !m.is_empty()),
    }
}

/// Words per sentence mapped onto 0–10, higher meaning shorter sentences.
/// Text without any `.`, `!` or `?` scores 0.
pub fn readability_score(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let words = text.split_whitespace().count();
    let sentences = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
    if sentences == 0 {
        return 0.0;
    }

    let avg_sentence_len = words as f64 / sentences as f64;
    round2((10.0 - avg_sentence_len / 10.0).max(0.0))
}
