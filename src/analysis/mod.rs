pub mod pipeline;
pub mod scoring;
pub mod insight;

pub use pipeline::AnalysisPipeline;
pub use scoring::ScoringEngine;
