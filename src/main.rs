use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use gitfolio::server::{build_router, AppState};
use gitfolio::{AnalysisPipeline, Config, GitHubClient, PipelineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitfolio=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    if config.github_token.is_none() {
        tracing::warn!(
            "GITHUB_TOKEN not set; running unauthenticated, pinned repositories will be skipped"
        );
    }

    let github = GitHubClient::new(config.github_token.as_deref())?;
    let pipeline = AnalysisPipeline::new(github, PipelineConfig::from(&config));
    let state = Arc::new(AppState { pipeline });

    let app = build_router(state, &config.cors_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server is running on port {}", config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
