use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GitHubUser, PinnedRepository, Repository};

/// Upstream access behind a seam so the ingestion pipeline can run against a
/// stub in tests.
///
/// Only the two mandatory calls return `Result`; every enrichment call
/// degrades to an empty value on failure so a single flaky endpoint never
/// poisons the whole report.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<GitHubUser>;

    /// First page of owned repositories, updated-desc. Pagination is not
    /// followed.
    async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>>;

    /// Decoded README text; `None` when the repo has none or the call failed.
    async fn get_readme(&self, username: &str, repo: &str) -> Option<String>;

    /// The owner's weekly commit counts (52 entries, oldest first). Empty
    /// when the stats are missing or still being computed upstream.
    async fn get_weekly_participation(&self, username: &str, repo: &str) -> Vec<u32>;

    async fn get_languages(&self, languages_url: &str) -> HashMap<String, u64>;

    /// Top-level file and directory names.
    async fn get_contents(&self, username: &str, repo: &str) -> Vec<String>;

    /// Pull requests authored anywhere on GitHub; 0 on failure.
    async fn count_pull_requests(&self, username: &str) -> u64;

    /// Pinned repositories via GraphQL. Empty without a configured token and
    /// on any failure.
    async fn get_pinned_repos(&self, username: &str) -> Vec<PinnedRepository>;
}
