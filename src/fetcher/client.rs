use crate::fetcher::{
    errors::FetchError,
    pipeline::process_response,
    types::{FetchConfig, PageResponse},
};
use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
    redirect::Policy,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const MAX_REDIRECTS: usize = 10;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can hand the batch coordinator a decoded page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError>;
}

/// HTTP fetcher with a fixed-delay retry loop.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let redirect = if config.follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .redirect(redirect)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches `url`, retrying retriable failures up to `max_retries` total
    /// attempts with `retry_delay` between them. The last error is returned
    /// once attempts run out.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = Url::parse(url)?;
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_once(&parsed_url).await {
                Ok(response) => return Ok(response),
                Err(err) if err.should_retry() && attempt < attempts => {
                    warn!(
                        "Request attempt {}/{} failed: {}, retrying...",
                        attempt, attempts, err
                    );
                    tokio::time::sleep(self.config.retry_delay()).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!("Giving up after {} attempt(s): {}", attempt, err);
                    return Err(err);
                }
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<PageResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let max_body = self.config.max_body_bytes;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > max_body
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        // 3xx only gets here with redirects disabled; its body is parsed as is
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Http {
                status,
                retriable: status.is_server_error(),
            });
        }

        // Any content type is handed to the parser
        let content_type = headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body_bytes = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Content-Length may have been missing or wrong
        if body_bytes.len() as u64 > max_body {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        Ok(process_response(
            final_url,
            status,
            headers,
            body_bytes,
            &content_type,
        ))
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        self.fetch(url).await
    }
}
