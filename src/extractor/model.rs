use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured extraction result for one URL.
///
/// Passes disabled in `ExtractionConfig` leave their field as `None`, and
/// `None` fields are left out of the serialized record entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    #[serde(with = "timestamp")]
    pub scraped_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkRef>>,
}

impl PageRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scraped_at: now(),
            title: None,
            text_content: None,
            metadata: None,
            images: None,
            videos: None,
            links: None,
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn full_text(&self) -> &str {
        self.text_content
            .as_ref()
            .map(|text| text.full_text.as_str())
            .unwrap_or_default()
    }

    pub fn headings(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.text_content.as_ref().map(|text| &text.headings)
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key).map(String::as_str)
    }

    pub fn image_count(&self) -> usize {
        self.images.as_ref().map_or(0, Vec::len)
    }

    pub fn video_count(&self) -> usize {
        self.videos.as_ref().map_or(0, Vec::len)
    }

    pub fn link_count(&self) -> usize {
        self.links.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// `"h1"`..`"h6"`; a level with no elements has no key.
    pub headings: BTreeMap<String, Vec<String>>,
    pub paragraphs: Vec<String>,
    pub lists: Vec<ListBlock>,
    pub full_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ul,
    Ol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    #[serde(rename = "type")]
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub alt: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// Attribute values are kept as the raw strings found in the markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VideoRef {
    Video {
        url: String,
        controls: String,
        autoplay: String,
        poster: String,
    },
    VideoSource {
        url: String,
        #[serde(rename = "typeAttr")]
        type_attr: String,
    },
    EmbeddedVideo {
        url: String,
        width: String,
        height: String,
    },
}

impl VideoRef {
    pub fn url(&self) -> &str {
        match self {
            Self::Video { url, .. } | Self::VideoSource { url, .. } | Self::EmbeddedVideo { url, .. } => {
                url
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Video { .. } => "video",
            Self::VideoSource { .. } => "video_source",
            Self::EmbeddedVideo { .. } => "embedded_video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    pub url: String,
    pub text: String,
    pub title: String,
    pub target: String,
}

/// Current local time truncated to whole seconds, which is all the
/// serialized form keeps.
pub fn now() -> NaiveDateTime {
    let local = Local::now().naive_local();
    local.with_nanosecond(0).unwrap_or(local)
}

/// `YYYY-MM-DD HH:MM:SS` local-naive timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}
