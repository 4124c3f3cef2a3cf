use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::ai::{AiAnalyzer, Outcome};
use crate::batch::model::{AnnotatedRecord, BatchEntry, BatchResult, ScrapeError, SetupError};
use crate::config::Config;
use crate::extractor::{self, ExtractionConfig};
use crate::fetcher::{Fetcher, PageSource};
use crate::output::OutputWriter;

/// Runs URLs through fetch, extract, score and (optionally) AI analysis,
/// strictly one at a time.
pub struct BatchCoordinator {
    source: Arc<dyn PageSource>,
    analyzer: Option<AiAnalyzer>,
    extraction: ExtractionConfig,
    delay: Duration,
    seo_enabled: bool,
    writer: Option<OutputWriter>,
}

impl BatchCoordinator {
    pub fn new(source: Arc<dyn PageSource>, extraction: ExtractionConfig) -> Self {
        Self {
            source,
            analyzer: None,
            extraction,
            delay: Duration::ZERO,
            seo_enabled: false,
            writer: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let fetcher = Fetcher::new(config.scraper.fetch.clone())?;
        let analyzer = AiAnalyzer::from_config(&config.ai, &config.agent)?;

        let mut coordinator = Self::new(Arc::new(fetcher), config.scraper.extraction.clone())
            .with_delay(config.scraper.delay())
            .with_seo(config.plugins.is_enabled(crate::config::SEO_PLUGIN))
            .with_writer(OutputWriter::new(config.output.clone()));
        coordinator.analyzer = analyzer;

        info!(
            ai = coordinator.analyzer.is_some(),
            seo = coordinator.seo_enabled,
            "Batch coordinator initialized"
        );
        Ok(coordinator)
    }

    pub fn with_analyzer(mut self, analyzer: AiAnalyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Pause between consecutive URLs.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_seo(mut self, enabled: bool) -> Self {
        self.seo_enabled = enabled;
        self
    }

    /// Successful records are also written to individual files when the
    /// writer's config asks for it.
    pub fn with_writer(mut self, writer: OutputWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn ai_available(&self) -> bool {
        self.analyzer.as_ref().is_some_and(AiAnalyzer::is_enabled)
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn process_url(&self, url: &str, enable_ai: bool) -> Result<AnnotatedRecord, ScrapeError> {
        info!("Processing URL");

        let response = self.source.fetch_page(url).await?;
        debug!(status = %response.status, final_url = %response.url_final, "fetched");

        let record = extractor::extract(
            &response.body_utf8,
            url,
            response.url_final.as_str(),
            &self.extraction,
        )?;

        let ai_analysis = match &self.analyzer {
            Some(analyzer) if enable_ai && analyzer.is_enabled() => {
                Some(match analyzer.analyze(&record).await {
                    Ok(analysis) => Outcome::Done(analysis),
                    Err(err) => {
                        warn!("AI analysis failed: {}", err);
                        Outcome::failed("AI analysis", err)
                    }
                })
            }
            _ => None,
        };

        let annotated = AnnotatedRecord::new(record, ai_analysis, self.seo_enabled);
        debug!(
            quality = annotated.agent_metadata.data_quality_score,
            richness = annotated.agent_metadata.content_richness.label(),
            "annotated"
        );
        Ok(annotated)
    }

    pub async fn process_batch(&self, urls: &[String], enable_ai: bool) -> BatchResult {
        self.process_batch_until(urls, enable_ai, &CancellationToken::new())
            .await
    }

    /// Processes `urls` in order until done or `cancel` fires. Entries
    /// finished before cancellation are kept; the URL in flight is dropped.
    pub async fn process_batch_until(
        &self,
        urls: &[String],
        enable_ai: bool,
        cancel: &CancellationToken,
    ) -> BatchResult {
        let run_id = Uuid::new_v4();
        info!(%run_id, urls = urls.len(), "Processing batch");

        let mut results = Vec::with_capacity(urls.len());
        let mut cancelled = false;

        for (index, url) in urls.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                outcome = self.process_url(url, enable_ai) => outcome,
            };

            let entry = match outcome {
                Ok(mut annotated) => {
                    self.save(url, &mut annotated).await;
                    BatchEntry::Annotated(Box::new(annotated))
                }
                Err(err) => {
                    warn!(url = %url, "Failed to process: {}", err);
                    BatchEntry::Failed {
                        url: url.clone(),
                        error: err.to_string(),
                    }
                }
            };
            results.push(entry);

            let is_last = index + 1 == urls.len();
            if !is_last && !self.delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        }

        if cancelled {
            warn!(%run_id, completed = results.len(), "Batch cancelled");
        }

        let result = BatchResult::new(run_id, results, cancelled);
        info!(
            %run_id,
            processed = result.processed_count,
            succeeded = result.success_count,
            "Batch finished"
        );
        result
    }

    async fn save(&self, url: &str, annotated: &mut AnnotatedRecord) {
        let Some(writer) = &self.writer else {
            return;
        };
        if !writer.config().save_individual_files {
            return;
        }
        match writer.save_record(url, annotated).await {
            Ok(path) => annotated.saved_to_file = Some(path.display().to_string()),
            Err(err) => warn!(url = %url, "Failed to save record: {:#}", err),
        }
    }
}
