pub mod coordinator;
pub mod model;

pub use coordinator::BatchCoordinator;
pub use model::{
    AgentMetadata, AnnotatedRecord, BatchEntry, BatchResult, BatchSummary, ScrapeError, SetupError,
};
