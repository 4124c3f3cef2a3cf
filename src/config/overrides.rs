//! Environment variables and `section.key=value` overrides.
//!
//! Keys are matched case-insensitively with underscores ignored, so
//! `scraper.maxRetries` and `scraper.max_retries` name the same field.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use super::{Config, ConfigError};

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_AI_MODEL: &str = "AI_MODEL";
pub const ENV_SCRAPER_DELAY: &str = "SCRAPER_DELAY";
pub const ENV_SCRAPER_TIMEOUT: &str = "SCRAPER_TIMEOUT";
pub const ENV_SCRAPER_MAX_RETRIES: &str = "SCRAPER_MAX_RETRIES";
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";

const ENV_KEYS: [(&str, &str); 7] = [
    (ENV_OPENAI_API_KEY, "ai.apiKey"),
    (ENV_OPENAI_BASE_URL, "ai.baseUrl"),
    (ENV_AI_MODEL, "ai.model"),
    (ENV_SCRAPER_DELAY, "scraper.delayBetweenRequests"),
    (ENV_SCRAPER_TIMEOUT, "scraper.requestTimeout"),
    (ENV_SCRAPER_MAX_RETRIES, "scraper.maxRetries"),
    (ENV_OUTPUT_DIR, "output.directory"),
];

impl Config {
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Applies the known variables found by `lookup`. Blank values are
    /// ignored.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        for (var, key) in ENV_KEYS {
            if let Some(value) = lookup(var)
                && !value.trim().is_empty()
            {
                debug!("Applying {} from environment", var);
                self.set(key, value.trim())?;
            }
        }
        Ok(())
    }

    /// Applies one `section.key=value` override.
    pub fn apply_override(&mut self, entry: &str) -> Result<(), ConfigError> {
        let (key, value) = entry
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| k.split_once('.').is_some_and(|(s, f)| !s.is_empty() && !f.is_empty()))
            .ok_or_else(|| ConfigError::MalformedOverride(entry.to_string()))?;
        self.set(key, value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some((section, field)) = key.split_once('.') else {
            return Err(ConfigError::UnknownKey(key.to_string()));
        };
        let section = normalize(section);
        let field = normalize(field);

        let scraper = &mut self.scraper;
        let fetch = &mut scraper.fetch;
        let extraction = &mut scraper.extraction;
        let ai = &mut self.ai;
        let agent = &mut self.agent;
        let output = &mut self.output;

        match (section.as_str(), field.as_str()) {
            ("scraper", "delaybetweenrequests") => scraper.delay_between_requests = parse(key, value)?,
            ("scraper", "requesttimeout") => fetch.request_timeout = parse(key, value)?,
            ("scraper", "maxretries") => fetch.max_retries = parse(key, value)?,
            ("scraper", "retrydelay") => fetch.retry_delay = parse(key, value)?,
            ("scraper", "verifyssl") => fetch.verify_ssl = parse(key, value)?,
            ("scraper", "followredirects") => fetch.follow_redirects = parse(key, value)?,
            ("scraper", "useragent") => fetch.user_agent = value.to_string(),
            ("scraper", "maxbodybytes") => fetch.max_body_bytes = parse(key, value)?,
            ("scraper", "extracttext") => extraction.extract_text = parse(key, value)?,
            ("scraper", "extractimages") => extraction.extract_images = parse(key, value)?,
            ("scraper", "extractvideos") => extraction.extract_videos = parse(key, value)?,
            ("scraper", "extractlinks") => extraction.extract_links = parse(key, value)?,
            ("scraper", "extractmetadata") => extraction.extract_metadata = parse(key, value)?,
            ("scraper", "cleantext") => extraction.clean_text = parse(key, value)?,
            ("scraper", "resolverelativeurls") => {
                extraction.resolve_relative_urls = parse(key, value)?
            }
            ("scraper", "mintextlength") => extraction.min_text_length = parse(key, value)?,
            ("scraper", "excludeemptycontent") => {
                extraction.exclude_empty_content = parse(key, value)?
            }
            ("scraper", "includeembeddedvideos") => {
                extraction.include_embedded_videos = parse(key, value)?
            }
            ("scraper", "videoplatforms") => {
                extraction.video_platforms = list(value).map(|p| p.to_lowercase()).collect()
            }
            ("scraper", "includeimagedimensions") => {
                extraction.include_image_dimensions = parse(key, value)?
            }

            ("ai", "apikey") => ai.api_key = Some(value.to_string()).filter(|v| !v.is_empty()),
            ("ai", "baseurl") => ai.base_url = value.to_string(),
            ("ai", "model") => ai.model = value.to_string(),
            ("ai", "maxtokens") => ai.max_tokens = parse(key, value)?,
            ("ai", "temperature") => ai.temperature = parse(key, value)?,
            ("ai", "timeoutsecs") => ai.timeout_secs = parse(key, value)?,
            ("ai", "enableaianalysis") => ai.enable_ai_analysis = parse(key, value)?,
            ("ai", "enablecontentsummarization") => {
                ai.enable_content_summarization = parse(key, value)?
            }
            ("ai", "enableimageanalysis") => ai.enable_image_analysis = parse(key, value)?,
            ("ai", "enablevideoanalysis") => ai.enable_video_analysis = parse(key, value)?,
            ("ai", "enabledecisionmaking") => ai.enable_decision_making = parse(key, value)?,

            ("agent", "imageanalysisthreshold") => {
                agent.image_analysis_threshold = parse(key, value)?
            }
            ("agent", "videoanalysisthreshold") => {
                agent.video_analysis_threshold = parse(key, value)?
            }
            ("agent", "maximagesanalyzed") => agent.max_images_analyzed = parse(key, value)?,
            ("agent", "contentsamplechars") => agent.content_sample_chars = parse(key, value)?,
            ("agent", "mincontentchars") => agent.min_content_chars = parse(key, value)?,

            ("output", "directory") => output.directory = PathBuf::from(value),
            ("output", "prettyprint") => output.pretty_print = parse(key, value)?,
            ("output", "saveindividualfiles") => output.save_individual_files = parse(key, value)?,

            ("plugins", "enabled") => self.plugins.enabled = list(value).map(str::to_string).collect(),

            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn normalize(part: &str) -> String {
    part.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Comma-separated items, blanks dropped.
fn list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
