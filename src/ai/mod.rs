//! Optional model-backed analysis of extracted pages.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod errors;
pub mod model;
pub mod prompts;

pub use analyzer::AiAnalyzer;
pub use client::{CompletionClient, OpenAiClient};
pub use config::{AgentConfig, AiConfig};
pub use errors::AiError;
pub use model::{AgentDecisions, AiAnalysis, ContentAnalysis, ImageAnalysis, Outcome, VideoAnalysis};
pub use prompts::PromptTemplates;
