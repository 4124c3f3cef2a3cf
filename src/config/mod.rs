//! Layered configuration.
//!
//! Values are resolved in a fixed order: built-in defaults, then an optional
//! TOML or JSON file, then environment variables, then explicit
//! `section.key=value` overrides. `validate` runs last and reports every
//! problem at once.

mod overrides;

pub use overrides::{
    ENV_AI_MODEL, ENV_OPENAI_API_KEY, ENV_OPENAI_BASE_URL, ENV_OUTPUT_DIR, ENV_SCRAPER_DELAY,
    ENV_SCRAPER_MAX_RETRIES, ENV_SCRAPER_TIMEOUT,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::ai::{AgentConfig, AiConfig};
use crate::extractor::ExtractionConfig;
use crate::fetcher::{FetchConfig, types::seconds};
use crate::output::OutputConfig;

pub const SEO_PLUGIN: &str = "seo";
pub const KNOWN_PLUGINS: [&str; 1] = [SEO_PLUGIN];

const MINIMAL_TEMPLATE: &str = r#"# pagescope configuration

[scraper]
delayBetweenRequests = 1.0
requestTimeout = 10.0
maxRetries = 3

[ai]
model = "gpt-4o-mini"
enableAiAnalysis = true

[output]
directory = "output"
"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config file '{0}' (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("failed to render config: {0}")]
    Render(String),

    #[error("malformed override '{0}' (expected section.key=value)")]
    MalformedOverride(String),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("configuration validation failed:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub ai: AiConfig,
    pub agent: AgentConfig,
    pub output: OutputConfig,
    pub plugins: PluginsConfig,
}

/// Fetch and extraction options share one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScraperConfig {
    /// Pause between URLs in a batch, in seconds.
    pub delay_between_requests: f64,
    #[serde(flatten)]
    pub fetch: FetchConfig,
    #[serde(flatten)]
    pub extraction: ExtractionConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_between_requests: 1.0,
            fetch: FetchConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ScraperConfig {
    pub fn delay(&self) -> Duration {
        seconds(self.delay_between_requests)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub enabled: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            enabled: vec![SEO_PLUGIN.to_string()],
        }
    }
}

impl PluginsConfig {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|p| p.eq_ignore_ascii_case(name))
    }
}

impl Config {
    /// Defaults, optionally replaced by the contents of `path`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Every layer in order, then validation.
    pub fn resolve(path: Option<&Path>, overrides: &[String]) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env()?;
        for entry in overrides {
            config.apply_override(entry)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Collects all violations so they can be fixed in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let scraper = &self.scraper;
        if !is_non_negative(scraper.delay_between_requests) {
            errors.push("scraper.delayBetweenRequests must be >= 0".to_string());
        }
        if !is_positive(scraper.fetch.request_timeout) {
            errors.push("scraper.requestTimeout must be > 0".to_string());
        }
        if !is_non_negative(scraper.fetch.retry_delay) {
            errors.push("scraper.retryDelay must be >= 0".to_string());
        }
        if scraper.fetch.max_retries == 0 {
            errors.push("scraper.maxRetries must be at least 1".to_string());
        }
        if scraper.fetch.max_body_bytes == 0 {
            errors.push("scraper.maxBodyBytes must be positive".to_string());
        }
        if scraper.fetch.user_agent.trim().is_empty() {
            errors.push("scraper.userAgent must not be empty".to_string());
        }

        let ai = &self.ai;
        if ai.model.trim().is_empty() {
            errors.push("ai.model must not be empty".to_string());
        }
        if ai.max_tokens == 0 {
            errors.push("ai.maxTokens must be positive".to_string());
        }
        if !(0.0..=2.0).contains(&ai.temperature) {
            errors.push(format!(
                "ai.temperature must be between 0.0 and 2.0, got {}",
                ai.temperature
            ));
        }
        if ai.timeout_secs == 0 {
            errors.push("ai.timeoutSecs must be positive".to_string());
        }
        if let Err(e) = Url::parse(&ai.base_url) {
            errors.push(format!("ai.baseUrl '{}' is not a valid URL: {}", ai.base_url, e));
        }

        if self.agent.content_sample_chars == 0 {
            errors.push("agent.contentSampleChars must be positive".to_string());
        }

        if self.output.directory.as_os_str().is_empty() {
            errors.push("output.directory must not be empty".to_string());
        }

        for plugin in &self.plugins.enabled {
            if !KNOWN_PLUGINS.iter().any(|k| k.eq_ignore_ascii_case(plugin)) {
                errors.push(format!("unknown plugin '{plugin}'"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// The full default configuration as TOML.
    pub fn default_template() -> Result<String, ConfigError> {
        toml::to_string_pretty(&Self::default()).map_err(|e| ConfigError::Render(e.to_string()))
    }

    pub fn minimal_template() -> &'static str {
        MINIMAL_TEMPLATE
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.scraper.delay(), Duration::from_secs(1));
        assert_eq!(config.scraper.fetch.max_retries, 3);
        assert_eq!(config.scraper.extraction.min_text_length, 10);
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.agent.image_analysis_threshold, 5);
        assert!(config.plugins.is_enabled(SEO_PLUGIN));
    }

    #[test]
    fn load_without_path_gives_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn load_toml_with_flattened_scraper_section() {
        let file = write_config(
            ".toml",
            r#"
[scraper]
delayBetweenRequests = 0
requestTimeout = 5
resolveRelativeUrls = false
videoPlatforms = ["youtube"]

[ai]
temperature = 0.7

[plugins]
enabled = []
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.scraper.delay(), Duration::ZERO);
        assert_eq!(config.scraper.fetch.request_timeout, 5.0);
        assert_eq!(config.scraper.fetch.max_retries, 3);
        assert!(!config.scraper.extraction.resolve_relative_urls);
        assert_eq!(config.scraper.extraction.video_platforms, vec!["youtube"]);
        assert_eq!(config.ai.temperature, 0.7);
        assert_eq!(config.ai.max_tokens, 1000);
        assert!(!config.plugins.is_enabled(SEO_PLUGIN));
    }

    #[test]
    fn load_json() {
        let file = write_config(".json", r#"{"output": {"prettyPrint": false}}"#);
        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.output.pretty_print);
        assert!(config.output.save_individual_files);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let file = write_config(".yaml", "scraper: {}");
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_reports_parse_errors() {
        let file = write_config(".toml", "[scraper\nmaxRetries = ");
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/pagescope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn validate_collects_every_error() {
        let mut config = Config::default();
        config.scraper.delay_between_requests = -1.0;
        config.scraper.fetch.max_retries = 0;
        config.ai.temperature = 3.0;
        config.ai.model = " ".to_string();
        config.plugins.enabled.push("analytics".to_string());

        let Err(ConfigError::Invalid(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().any(|e| e.contains("delayBetweenRequests")));
        assert!(errors.iter().any(|e| e.contains("unknown plugin 'analytics'")));
    }

    #[test]
    fn validate_rejects_nan_timeout() {
        let mut config = Config::default();
        config.scraper.fetch.request_timeout = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_template_round_trips() {
        let rendered = Config::default_template().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn minimal_template_parses_and_validates() {
        let parsed: Config = toml::from_str(Config::minimal_template()).unwrap();
        assert!(parsed.validate().is_ok());
    }
}
