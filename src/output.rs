//! JSON files for single records and whole batch runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub pretty_print: bool,
    pub save_individual_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            pretty_print: true,
            save_individual_files: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    config: OutputConfig,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Writes one record as `scraped_<domain>_<unix>.json`.
    pub async fn save_record<T: Serialize>(&self, url: &str, value: &T) -> Result<PathBuf> {
        let name = record_file_stem(url, unix_now());
        let path = unique_path(&self.config.directory, &name).await;
        self.write(&path, value).await?;
        Ok(path)
    }

    /// Writes a batch as `scraping_results_<unix>.json`.
    pub async fn save_batch<T: Serialize>(&self, value: &T) -> Result<PathBuf> {
        let name = format!("scraping_results_{}", unix_now());
        let path = unique_path(&self.config.directory, &name).await;
        self.write(&path, value).await?;
        Ok(path)
    }

    /// Writes to an explicit path, creating parent directories.
    pub async fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let body = if self.config.pretty_print {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .context("Failed to serialize output")?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Data saved to {}", path.display());
        Ok(())
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// `scraped_<host>_<unix>` with dots and colons in the host replaced by `_`.
pub fn record_file_stem(url: &str, unix: u64) -> String {
    let domain = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str().map(|host| match u.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            })
        })
        .unwrap_or_else(|| "unknown".to_string());
    format!("scraped_{}_{unix}", domain.replace(['.', ':'], "_"))
}

/// Appends `_1`, `_2`, ... until the name is free.
async fn unique_path(dir: &Path, stem: &str) -> PathBuf {
    let mut path = dir.join(format!("{stem}.json"));
    let mut n = 1;
    while tokio::fs::try_exists(&path).await.unwrap_or(false) {
        path = dir.join(format!("{stem}_{n}.json"));
        n += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn writer(dir: &Path, pretty: bool) -> OutputWriter {
        OutputWriter::new(OutputConfig {
            directory: dir.to_path_buf(),
            pretty_print: pretty,
            save_individual_files: true,
        })
    }

    #[test]
    fn test_record_file_stem() {
        assert_eq!(
            record_file_stem("https://blog.example.com/post", 1700000000),
            "scraped_blog_example_com_1700000000"
        );
        assert_eq!(
            record_file_stem("http://127.0.0.1:8080/", 5),
            "scraped_127_0_0_1_8080_5"
        );
        assert_eq!(record_file_stem("not a url", 5), "scraped_unknown_5");
    }

    #[tokio::test]
    async fn test_save_record_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        let path = writer(&dir, true)
            .save_record("https://example.com/a", &json!({"url": "https://example.com/a"}))
            .await
            .unwrap();

        assert!(path.starts_with(&dir));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("scraped_example_com_"));

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\n  \"url\""));
    }

    #[tokio::test]
    async fn test_same_second_records_do_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = writer(tmp.path(), false);

        let first = writer.save_record("https://example.com/a", &json!({"n": 1})).await.unwrap();
        let second = writer.save_record("https://example.com/b", &json!({"n": 2})).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), r#"{"n":1}"#);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), r#"{"n":2}"#);
    }

    #[tokio::test]
    async fn test_save_batch_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = writer(tmp.path(), true).save_batch(&json!({"results": []})).await.unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("scraping_results_"));
        assert!(name.ends_with(".json"));
    }
}
