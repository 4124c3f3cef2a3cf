use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::extractor::model::{ListBlock, ListKind, TextContent};
use crate::extractor::options::ExtractionConfig;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul, ol").unwrap());
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static HEADINGS: LazyLock<[Selector; 6]> =
    LazyLock::new(|| HEADING_TAGS.map(|tag| Selector::parse(tag).unwrap()));

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Subtrees whose text never reaches the full text.
const NON_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Concatenated text of an element, trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Meta tags keyed by `name`, then `property`, then `http-equiv`.
/// Later tags overwrite earlier ones with the same key.
pub fn extract_metadata(document: &Html) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    for tag in document.select(&META) {
        let attrs = tag.value();
        let key = ["name", "property", "http-equiv"]
            .iter()
            .find_map(|attr| attrs.attr(attr).filter(|value| !value.is_empty()));
        let content = attrs.attr("content").filter(|value| !value.is_empty());

        if let (Some(key), Some(content)) = (key, content) {
            metadata.insert(key.to_string(), content.to_string());
        }
    }

    metadata
}

pub fn extract_text_content(document: &Html, config: &ExtractionConfig) -> TextContent {
    let mut headings = BTreeMap::new();
    for (tag, selector) in HEADING_TAGS.iter().zip(HEADINGS.iter()) {
        let texts: Vec<String> = document.select(selector).map(element_text).collect();
        if !texts.is_empty() {
            headings.insert(tag.to_string(), texts);
        }
    }

    let paragraphs = document
        .select(&PARAGRAPH)
        .map(element_text)
        .filter(|text| !text.is_empty() && text.chars().count() >= config.min_text_length)
        .collect();

    let lists = document
        .select(&LIST)
        .map(|list| ListBlock {
            kind: if list.value().name() == "ol" {
                ListKind::Ol
            } else {
                ListKind::Ul
            },
            items: list.select(&LIST_ITEM).map(element_text).collect(),
        })
        .collect();

    let raw_text = visible_text(document);
    let full_text = if config.clean_text {
        clean_text(&raw_text)
    } else {
        raw_text
    };

    TextContent {
        headings,
        paragraphs,
        lists,
        full_text,
    }
}

/// Whole-document text with script and style subtrees left out.
pub fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    push_text(document.root_element(), &mut out);
    out
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child)
            && !NON_TEXT_ELEMENTS.contains(&child_element.value().name())
        {
            push_text(child_element, out);
        }
    }
}

/// Collapses every whitespace run to one ASCII space and trims both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
