pub mod config;
pub mod error;
pub mod models;
pub mod profile_url;
pub mod github;
pub mod analysis;
pub mod server;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::{GitHubApi, GitHubClient};
pub use analysis::{AnalysisPipeline, ScoringEngine};
