use crate::fetcher::types::PageResponse;
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

const CHARSET_SNIFF_BYTES: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Turns a downloaded body into a `PageResponse` with UTF-8 text.
///
/// Undecodable byte sequences are replaced rather than rejected so that a
/// page with a lying charset still yields whatever content it has.
pub fn process_response(
    url_final: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, &body_bytes);
    let (decoded, _, had_errors) = charset.decode(&body_bytes);
    if had_errors {
        debug!(
            "replaced malformed {} sequences while decoding {}",
            charset.name(),
            url_final
        );
    }

    PageResponse {
        url_final,
        status,
        headers,
        body_utf8: decoded.into_owned(),
        body_raw: body_bytes,
        charset,
        fetched_at: Utc::now(),
    }
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    // Content-Type header wins
    if let Some(encoding) = label_from(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    // Then <meta charset> / <meta http-equiv> near the top of the document
    let sniff = &body_bytes[..body_bytes.len().min(CHARSET_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(sniff);
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &head)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &head))
    {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(sniff, false);
    detector.guess(None, true)
}

fn label_from(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
