use std::env;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub github_token: Option<String>,
    pub concurrency_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a valid port number, got '{}'", value)))?,
            Err(_) => 5000,
        };

        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

        // Optional: without it the REST calls are unauthenticated and pinned
        // repositories are skipped entirely.
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let concurrency_limit = env::var("CONCURRENCY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);

        Ok(Self {
            port,
            cors_origin,
            github_token,
            concurrency_limit,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
        }
    }
}
