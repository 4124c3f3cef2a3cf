use bytes::Bytes;
use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use reqwest::{StatusCode, header::HeaderMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) pagescope/0.1";

/// Transport options for a single page fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub request_timeout: f64,
    /// Total attempts per URL, including the first one.
    pub max_retries: u32,
    /// Fixed pause between attempts, in seconds.
    pub retry_delay: f64,
    pub verify_ssl: bool,
    pub follow_redirects: bool,
    pub user_agent: String,
    pub max_body_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            max_retries: 3,
            retry_delay: 1.0,
            verify_ssl: true,
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        seconds(self.request_timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        seconds(self.retry_delay)
    }
}

/// Converts a fractional second count from config into a `Duration`,
/// treating negative or non-finite values as zero.
pub fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[derive(Debug)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body_raw: Bytes,
    pub body_utf8: String,
    pub charset: &'static Encoding,
    pub fetched_at: DateTime<Utc>,
}
