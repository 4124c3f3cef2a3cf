pub mod ai;
pub mod batch;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod output;
pub mod scoring;
pub mod telemetry;

pub use batch::{AnnotatedRecord, BatchCoordinator, BatchEntry, BatchResult, BatchSummary};
pub use config::Config;
pub use extractor::{ExtractionConfig, PageRecord};
pub use fetcher::{FetchConfig, Fetcher, PageSource};
