use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::GitHubUser;

/// A repository as returned by the owned-repos listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub languages_url: String,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A target-set repository after the per-repo fan-out. When every optional
/// fetch failed this carries the raw listing entry with empty evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRepository {
    #[serde(flatten)]
    pub repo: Repository,
    pub readme: Option<String>,
    /// Owner commits per week, oldest first, 52 entries when available.
    pub weekly_commits: Vec<u32>,
    pub languages: HashMap<String, u64>,
    /// Top-level file and directory basenames.
    pub files: Vec<String>,
}

impl EnrichedRepository {
    /// Sum of the last 13 weekly buckets (roughly the last 90 days).
    pub fn recent_commits(&self) -> u32 {
        let start = self.weekly_commits.len().saturating_sub(13);
        self.weekly_commits[start..].iter().sum()
    }

    pub fn readme_chars(&self) -> usize {
        self.readme.as_deref().map_or(0, |r| r.chars().count())
    }

    pub fn has_description(&self) -> bool {
        self.repo
            .description
            .as_deref()
            .is_some_and(|d| !d.is_empty())
    }
}

/// A user-curated showcase entry from the GraphQL pinned-items query.
/// `languages` mirrors the legacy per-language map; nothing scores it yet but
/// downstream consumers still read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedRepository {
    pub name: String,
    pub description: Option<String>,
    pub stars: u32,
    pub language: Option<String>,
    pub language_color: Option<String>,
    #[serde(default)]
    pub languages: HashMap<String, u8>,
}

/// Everything the scoring engine consumes for one user.
#[derive(Debug, Clone)]
pub struct ProfileEvidence {
    pub user: GitHubUser,
    /// Enriched non-fork repos in listing order, at most 15.
    pub repos: Vec<EnrichedRepository>,
    pub total_repos: usize,
    /// Authored pull requests across GitHub; 0 when the search call failed.
    /// Not consumed by the scoring dimensions, kept for inspection output.
    pub pr_count: u64,
    /// The full first-page listing, used for aggregate star/fork sums.
    pub all_repos: Vec<Repository>,
    pub pinned_repos: Vec<PinnedRepository>,
}
