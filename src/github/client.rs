use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::github::api::GitHubApi;
use crate::github::graphql;
use crate::models::{GitHubUser, PinnedRepository, Repository};

pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
    graphql_url: String,
}

#[derive(Deserialize)]
struct ReadmeResponse {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct Participation {
    #[serde(default)]
    owner: Vec<u32>,
}

#[derive(Deserialize)]
struct ContentEntry {
    name: String,
}

#[derive(Deserialize)]
struct SearchResult {
    total_count: u64,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitfolio/0.1"),
        );
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("token {}", token))?,
            );
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            token: token.map(str::to_string),
            base_url: "https://api.github.com".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
        })
    }

    /// Error mapping for the two mandatory calls.
    fn mandatory_error(status: StatusCode, context: &str) -> Error {
        match status {
            StatusCode::NOT_FOUND => Error::UserNotFound,
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
            _ => Error::Upstream(format!("{}: {}", context, status)),
        }
    }

    /// GitHub wraps the base64 payload across lines; the decoder rejects
    /// whitespace, so strip it first.
    fn decode_readme(content: &str) -> Option<String> {
        let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64_ENGINE.decode(cleaned).ok()?;
        String::from_utf8(bytes).ok().filter(|text| !text.is_empty())
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::mandatory_error(
                response.status(),
                &format!("failed to fetch user {}", username),
            ));
        }

        Ok(response.json().await?)
    }

    async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let url = format!(
            "{}/users/{}/repos?per_page=100&sort=updated&type=owner",
            self.base_url, username
        );
        tracing::info!("Fetching repositories for: {}", username);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::mandatory_error(
                response.status(),
                &format!("failed to list repos for {}", username),
            ));
        }

        Ok(response.json().await?)
    }

    async fn get_readme(&self, username: &str, repo: &str) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, username, repo);
        tracing::debug!("Fetching README for {}/{}", username, repo);

        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let body: ReadmeResponse = response.json().await.ok()?;
        Self::decode_readme(&body.content?)
    }

    async fn get_weekly_participation(&self, username: &str, repo: &str) -> Vec<u32> {
        let url = format!(
            "{}/repos/{}/{}/stats/participation",
            self.base_url, username, repo
        );
        tracing::debug!("Fetching participation stats for {}/{}", username, repo);

        let Ok(response) = self.client.get(&url).send().await else {
            return Vec::new();
        };
        // A 202 means GitHub is still computing the stats; treat it the same
        // as missing data.
        if response.status() != StatusCode::OK {
            return Vec::new();
        }

        response
            .json::<Participation>()
            .await
            .map(|p| p.owner)
            .unwrap_or_default()
    }

    async fn get_languages(&self, languages_url: &str) -> HashMap<String, u64> {
        let Ok(response) = self.client.get(languages_url).send().await else {
            return HashMap::new();
        };
        if !response.status().is_success() {
            return HashMap::new();
        }

        response.json().await.unwrap_or_default()
    }

    async fn get_contents(&self, username: &str, repo: &str) -> Vec<String> {
        let url = format!("{}/repos/{}/{}/contents", self.base_url, username, repo);

        let Ok(response) = self.client.get(&url).send().await else {
            return Vec::new();
        };
        if !response.status().is_success() {
            return Vec::new();
        }

        response
            .json::<Vec<ContentEntry>>()
            .await
            .map(|entries| entries.into_iter().map(|e| e.name).collect())
            .unwrap_or_default()
    }

    async fn count_pull_requests(&self, username: &str) -> u64 {
        // The search endpoint has its own, much smaller rate-limit window;
        // degrade to 0 instead of failing the request.
        let url = format!(
            "{}/search/issues?q=type:pr+author:{}",
            self.base_url, username
        );

        let Ok(response) = self.client.get(&url).send().await else {
            return 0;
        };
        if !response.status().is_success() {
            tracing::debug!(
                "PR search for {} returned {}, counting 0",
                username,
                response.status()
            );
            return 0;
        }

        response
            .json::<SearchResult>()
            .await
            .map(|r| r.total_count)
            .unwrap_or(0)
    }

    async fn get_pinned_repos(&self, username: &str) -> Vec<PinnedRepository> {
        // Pinned items are only reachable through GraphQL, which requires a
        // token; skip the call entirely when none is configured.
        let Some(token) = self.token.as_deref() else {
            return Vec::new();
        };

        match graphql::fetch_pinned(&self.client, &self.graphql_url, token, username).await {
            Ok(pinned) => pinned,
            Err(e) => {
                tracing::warn!("Failed to fetch pinned repos for {}: {}", username, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_readme_handles_wrapped_base64() {
        // "hello world" split across lines the way the contents API wraps it
        let wrapped = "aGVsbG8g\nd29ybGQ=\n";
        assert_eq!(
            GitHubClient::decode_readme(wrapped),
            Some("hello world".to_string())
        );
    }

    #[test]
    fn test_decode_readme_rejects_garbage() {
        assert_eq!(GitHubClient::decode_readme("!!not base64!!"), None);
    }

    #[test]
    fn test_mandatory_error_mapping() {
        assert!(matches!(
            GitHubClient::mandatory_error(StatusCode::NOT_FOUND, "user"),
            Error::UserNotFound
        ));
        assert!(matches!(
            GitHubClient::mandatory_error(StatusCode::FORBIDDEN, "user"),
            Error::RateLimited
        ));
        assert!(matches!(
            GitHubClient::mandatory_error(StatusCode::TOO_MANY_REQUESTS, "user"),
            Error::RateLimited
        ));
        assert!(matches!(
            GitHubClient::mandatory_error(StatusCode::BAD_GATEWAY, "user"),
            Error::Upstream(_)
        ));
    }
}
