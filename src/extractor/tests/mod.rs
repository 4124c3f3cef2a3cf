use std::fs;

use crate::extractor::text::clean_text;
use crate::extractor::{
    ExtractionConfig, ExtractionError, ListKind, PageRecord, VideoRef, extract,
};

const PAGE_URL: &str = "https://example.com/blog/raft";

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn extract_fixture(name: &str, config: &ExtractionConfig) -> PageRecord {
    extract(&fixture(name), PAGE_URL, PAGE_URL, config).expect("extraction should succeed")
}

#[test]
fn test_extract_article_text() {
    let record = extract_fixture("article.html", &ExtractionConfig::default());

    assert_eq!(record.url, PAGE_URL);
    assert_eq!(record.title(), "Understanding Raft: Leader Election in Practice");

    let text = record.text_content.as_ref().unwrap();
    assert_eq!(text.headings["h1"], vec!["Understanding Raft"]);
    assert_eq!(text.headings["h2"], vec!["Terms", "Timeouts"]);
    assert!(!text.headings.contains_key("h3"));

    assert_eq!(
        text.paragraphs,
        vec![
            "Raft splits consensus into leader election, log replication and safety.",
            "Each term begins with an election.",
            "Followers that hear nothing within the election timeout become candidates.",
            "Read the paper or see .",
        ]
    );

    assert_eq!(text.lists.len(), 2);
    assert_eq!(text.lists[0].kind, ListKind::Ul);
    assert_eq!(text.lists[0].items, vec!["Follower", "Candidate", "Leader"]);
    assert_eq!(text.lists[1].kind, ListKind::Ol);
    assert_eq!(text.lists[1].items, vec!["Increment term", "Vote for self"]);

    assert!(text.full_text.starts_with("Understanding Raft: Leader Election in Practice"));
    assert!(text.full_text.contains("Follower Candidate Leader"));
    assert!(!text.full_text.contains("analytics"));
    assert!(!text.full_text.contains("tracking"));
    assert!(!text.full_text.contains("font-family"));
    assert!(!text.full_text.contains("  "));
}

#[test]
fn test_extract_article_metadata_last_duplicate_wins() {
    let record = extract_fixture("article.html", &ExtractionConfig::default());
    let metadata = record.metadata.as_ref().unwrap();

    assert_eq!(metadata.len(), 3);
    assert_eq!(metadata["description"], "Updated description wins.");
    assert_eq!(metadata["og:site_name"], "Systems Notes");
    assert_eq!(metadata["og:title"], "Understanding Raft");
}

#[test]
fn test_extract_article_images() {
    let record = extract_fixture("article.html", &ExtractionConfig::default());
    let images = record.images.as_ref().unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].url, "https://example.com/images/states.png");
    assert_eq!(images[0].alt, "Raft state machine");
    assert_eq!(images[0].title, "States");
    assert_eq!(images[0].width.as_deref(), Some("640"));
    assert_eq!(images[0].height.as_deref(), Some("480"));

    assert_eq!(images[1].url, "https://example.com/blog/timeline.svg");
    assert_eq!(images[1].alt, "");
    assert_eq!(images[1].width.as_deref(), Some(""));
}

#[test]
fn test_image_dimensions_can_be_left_out() {
    let config = ExtractionConfig {
        include_image_dimensions: false,
        ..ExtractionConfig::default()
    };
    let record = extract_fixture("article.html", &config);
    let images = record.images.as_ref().unwrap();

    assert!(images.iter().all(|img| img.width.is_none() && img.height.is_none()));
    let json = serde_json::to_value(&images[0]).unwrap();
    assert!(json.get("width").is_none());
}

#[test]
fn test_extract_article_videos_in_document_order() {
    let record = extract_fixture("article.html", &ExtractionConfig::default());
    let videos = record.videos.as_ref().unwrap();

    assert_eq!(
        videos,
        &vec![
            VideoRef::Video {
                url: "https://example.com/media/demo.mp4".to_string(),
                controls: String::new(),
                autoplay: String::new(),
                poster: "/media/poster.jpg".to_string(),
            },
            VideoRef::VideoSource {
                url: "https://example.com/media/demo.webm".to_string(),
                type_attr: "video/webm".to_string(),
            },
            VideoRef::EmbeddedVideo {
                url: "https://player.vimeo.com/video/12345".to_string(),
                width: "640".to_string(),
                height: "360".to_string(),
            },
        ]
    );
}

#[test]
fn test_embedded_videos_can_be_disabled() {
    let config = ExtractionConfig {
        include_embedded_videos: false,
        ..ExtractionConfig::default()
    };
    let record = extract_fixture("article.html", &config);
    let videos = record.videos.as_ref().unwrap();

    assert_eq!(videos.len(), 2);
    assert!(videos.iter().all(|v| !matches!(v, VideoRef::EmbeddedVideo { .. })));
}

#[test]
fn test_extract_article_links() {
    let record = extract_fixture("article.html", &ExtractionConfig::default());
    let links = record.links.as_ref().unwrap();

    let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/",
            "https://example.com/archive",
            "https://raft.github.io/raft.pdf",
        ]
    );
    assert_eq!(links[1].text, "Archive");
    assert_eq!(links[1].title, "All posts");
    assert_eq!(links[1].target, "_self");
    assert_eq!(links[2].title, "");
}

#[test]
fn test_links_with_empty_text_kept_when_allowed() {
    let config = ExtractionConfig {
        exclude_empty_content: false,
        ..ExtractionConfig::default()
    };
    let record = extract_fixture("article.html", &config);
    let links = record.links.as_ref().unwrap();

    assert_eq!(links.len(), 4);
    assert_eq!(links[3].url, "https://example.com/blog/related.html");
    assert_eq!(links[3].text, "");
}

#[test]
fn test_relative_image_resolution_toggle() {
    let html = r#"<html><body><img src="/img/a.png" alt="a"></body></html>"#;
    let page = "https://example.com/blog/post";

    let resolved = extract(html, page, page, &ExtractionConfig::default()).unwrap();
    assert_eq!(resolved.images.unwrap()[0].url, "https://example.com/img/a.png");

    let config = ExtractionConfig {
        resolve_relative_urls: false,
        ..ExtractionConfig::default()
    };
    let verbatim = extract(html, page, page, &config).unwrap();
    assert_eq!(verbatim.images.unwrap()[0].url, "/img/a.png");
}

#[test]
fn test_min_text_length_filters_paragraphs() {
    let html = "<html><body><p>tiny</p><p>just long enough</p></body></html>";
    let config = ExtractionConfig {
        min_text_length: 5,
        ..ExtractionConfig::default()
    };
    let record = extract(html, PAGE_URL, PAGE_URL, &config).unwrap();
    assert_eq!(record.text_content.unwrap().paragraphs, vec!["just long enough"]);

    let permissive = ExtractionConfig {
        min_text_length: 0,
        ..ExtractionConfig::default()
    };
    let record = extract(html, PAGE_URL, PAGE_URL, &permissive).unwrap();
    assert_eq!(record.text_content.unwrap().paragraphs.len(), 2);
}

#[test]
fn test_scripts_only_document_has_no_text() {
    let record = extract_fixture("scripts_only.html", &ExtractionConfig::default());
    assert_eq!(record.full_text(), "");
}

#[test]
fn test_uncleaned_text_keeps_whitespace() {
    let html = "<html><body><p>one</p>\n\n<p>two</p></body></html>";
    let config = ExtractionConfig {
        clean_text: false,
        ..ExtractionConfig::default()
    };
    let record = extract(html, PAGE_URL, PAGE_URL, &config).unwrap();
    assert_eq!(record.full_text(), "one\n\ntwo");
}

#[test]
fn test_headings_grouped_by_level() {
    let html = "<html><body>\
        <h6>six</h6><h1>one</h1><h3>three a</h3><h3>three b</h3><h5> </h5>\
        </body></html>";
    let record = extract(html, PAGE_URL, PAGE_URL, &ExtractionConfig::default()).unwrap();
    let headings = &record.text_content.as_ref().unwrap().headings;

    assert_eq!(headings["h1"], vec!["one"]);
    assert_eq!(headings["h3"], vec!["three a", "three b"]);
    assert_eq!(headings["h5"], vec![""]);
    assert_eq!(headings["h6"], vec!["six"]);
    assert!(!headings.contains_key("h2"));
    assert!(!headings.contains_key("h4"));
}

#[test]
fn test_empty_document_yields_empty_collections() {
    let record = extract_fixture("empty.html", &ExtractionConfig::default());

    assert_eq!(record.title.as_deref(), Some(""));
    assert_eq!(record.full_text(), "");
    let text = record.text_content.as_ref().unwrap();
    assert!(text.headings.is_empty());
    assert!(text.paragraphs.is_empty());
    assert!(text.lists.is_empty());
    assert_eq!(record.metadata.as_ref().map(|m| m.len()), Some(0));
    assert_eq!(record.images.as_ref().map(Vec::len), Some(0));
    assert_eq!(record.videos.as_ref().map(Vec::len), Some(0));
    assert_eq!(record.links.as_ref().map(Vec::len), Some(0));
}

#[test]
fn test_disabled_passes_are_omitted() {
    let config = ExtractionConfig {
        extract_text: false,
        extract_images: false,
        extract_videos: false,
        extract_links: false,
        extract_metadata: false,
        ..ExtractionConfig::default()
    };
    let record = extract_fixture("article.html", &config);
    let json = serde_json::to_value(&record).unwrap();
    let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();

    assert_eq!(keys, vec!["scrapedAt", "url"]);
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let record = extract(html, PAGE_URL, PAGE_URL, &ExtractionConfig::default()).unwrap();

    assert_eq!(record.title(), "Broken");
    assert!(record.full_text().contains("Unclosed tags"));
    assert!(record.full_text().contains("More content"));
}

#[test]
fn test_invalid_base_url_is_an_error() {
    let result = extract("<p>hi</p>", "not a url", "not a url", &ExtractionConfig::default());
    assert!(matches!(result, Err(ExtractionError::InvalidBaseUrl { .. })));
}

#[test]
fn test_record_serialization_round_trip() {
    let record = extract_fixture("article.html", &ExtractionConfig::default());
    let json = serde_json::to_string(&record).unwrap();

    assert!(json.contains("\"textContent\""));
    assert!(json.contains("\"fullText\""));
    assert!(json.contains("\"type\":\"video_source\""));
    assert!(json.contains("\"typeAttr\":\"video/webm\""));
    assert!(json.contains("\"type\":\"ul\""));

    let decoded: PageRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_scraped_at_format() {
    let record = extract("<p>x</p>", PAGE_URL, PAGE_URL, &ExtractionConfig::default()).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    let stamp = json["scrapedAt"].as_str().unwrap();

    assert_eq!(stamp.len(), 19);
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_clean_text_leaves_no_whitespace_runs(text in "[ \t\na-z\u{a0}\u{2003}.]{0,80}") {
            let cleaned = clean_text(&text);
            let chars: Vec<char> = cleaned.chars().collect();

            prop_assert!(chars.windows(2).all(|w| !(w[0].is_whitespace() && w[1].is_whitespace())));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
            prop_assert_eq!(clean_text(&cleaned), cleaned);
        }

        #[test]
        fn test_extract_never_panics(html in ".*", path in "[a-z/]{0,12}") {
            let url = format!("https://example.com/{path}");
            let _ = extract(&html, &url, &url, &ExtractionConfig::default());
        }

        #[test]
        fn test_script_and_style_text_never_leaks(body in "[a-z ]{0,40}") {
            let html = format!(
                "<html><head><style>{body}</style></head><body><script>{body}</script></body></html>"
            );
            let record = extract(&html, PAGE_URL, PAGE_URL, &ExtractionConfig::default()).unwrap();
            prop_assert_eq!(record.full_text(), "");
        }
    }
}
