use serde::{Deserialize, Serialize};

use crate::extractor::PageRecord;
use crate::scoring::round2;

const MAX_PRIORITY: f64 = 10.0;

pub const SUMMARIZE_LENGTHY: &str = "summarize lengthy content";
pub const OPTIMIZE_IMAGES: &str = "image optimization analysis";
pub const ANALYZE_VIDEO: &str = "analyze video engagement potential";
pub const ANALYZE_LINKS: &str = "link analysis for SEO insights";

/// Counts the priority rules look at; also sent to the model verbatim as
/// the `data_summary` prompt slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub url: String,
    pub title: String,
    pub content_length: usize,
    pub images_count: usize,
    pub videos_count: usize,
    pub links_count: usize,
    pub has_analysis: bool,
}

impl DataSummary {
    pub fn from_record(record: &PageRecord, has_analysis: bool) -> Self {
        Self {
            url: record.url.clone(),
            title: record.title().to_string(),
            content_length: record.full_text().chars().count(),
            images_count: record.image_count(),
            videos_count: record.video_count(),
            links_count: record.link_count(),
            has_analysis,
        }
    }
}

pub fn priority_score(summary: &DataSummary) -> f64 {
    let mut score: f64 = 0.0;

    score += match summary.content_length {
        len if len > 1000 => 3.0,
        len if len > 500 => 2.0,
        len if len > 100 => 1.0,
        _ => 0.0,
    };
    if summary.images_count > 5 {
        score += 2.0;
    }
    if summary.videos_count > 0 {
        score += 3.0;
    }
    if summary.links_count > 10 {
        score += 1.0;
    }

    score.min(MAX_PRIORITY)
}

pub fn recommendations(summary: &DataSummary) -> Vec<String> {
    [
        (summary.content_length > 2000, SUMMARIZE_LENGTHY),
        (summary.images_count > 10, OPTIMIZE_IMAGES),
        (summary.videos_count > 0, ANALYZE_VIDEO),
        (summary.links_count > 20, ANALYZE_LINKS),
    ]
    .into_iter()
    .filter(|(applies, _)| *applies)
    .map(|(_, tag)| tag.to_string())
    .collect()
}

/// Mean over the analyses that ran, 0 when neither did. An analysis that
/// ran without producing a score should be passed as `Some(0.0)`.
pub fn overall_score(readability: Option<f64>, priority: Option<f64>) -> f64 {
    let scores: Vec<f64> = [readability, priority].into_iter().flatten().collect();
    if scores.is_empty() {
        return 0.0;
    }
    round2(scores.iter().sum::<f64>() / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn summary(content: usize, images: usize, videos: usize, links: usize) -> DataSummary {
        DataSummary {
            url: "https://example.com/".to_string(),
            title: "Example".to_string(),
            content_length: content,
            images_count: images,
            videos_count: videos,
            links_count: links,
            has_analysis: false,
        }
    }

    #[test]
    fn test_priority_components() {
        assert_eq!(priority_score(&summary(0, 0, 0, 0)), 0.0);
        assert_eq!(priority_score(&summary(101, 0, 0, 0)), 1.0);
        assert_eq!(priority_score(&summary(501, 0, 0, 0)), 2.0);
        assert_eq!(priority_score(&summary(1001, 0, 0, 0)), 3.0);
        assert_eq!(priority_score(&summary(0, 5, 0, 10)), 0.0);
        assert_eq!(priority_score(&summary(0, 6, 0, 11)), 3.0);
        assert_eq!(priority_score(&summary(1001, 6, 1, 11)), 9.0);
    }

    #[test]
    fn test_recommendations_in_fixed_order() {
        assert!(recommendations(&summary(2000, 10, 0, 20)).is_empty());
        assert_eq!(
            recommendations(&summary(2001, 11, 1, 21)),
            vec![SUMMARIZE_LENGTHY, OPTIMIZE_IMAGES, ANALYZE_VIDEO, ANALYZE_LINKS]
        );
        assert_eq!(recommendations(&summary(0, 0, 2, 30)), vec![ANALYZE_VIDEO, ANALYZE_LINKS]);
    }

    #[test]
    fn test_overall_score() {
        assert_eq!(overall_score(None, None), 0.0);
        assert_eq!(overall_score(Some(7.5), None), 7.5);
        assert_eq!(overall_score(None, Some(4.0)), 4.0);
        assert_eq!(overall_score(Some(9.83), Some(6.0)), 7.91);
        assert_eq!(overall_score(Some(0.0), Some(2.0)), 1.0);
    }

    proptest! {
        #[test]
        fn test_priority_never_exceeds_ten(
            content in 0usize..1_000_000,
            images in 0usize..10_000,
            videos in 0usize..10_000,
            links in 0usize..10_000,
        ) {
            let score = priority_score(&summary(content, images, videos, links));
            prop_assert!((0.0..=10.0).contains(&score));
        }
    }
}
