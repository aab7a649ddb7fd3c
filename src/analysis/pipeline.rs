use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::analysis::scoring::ScoringEngine;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::GitHubApi;
use crate::models::{EnrichedRepository, ProfileEvidence, Repository, ScoreReport};
use crate::profile_url::extract_username;

/// Drives one analysis end to end: username extraction, the concurrent
/// evidence fan-out, and the scoring pass.
pub struct AnalysisPipeline {
    github: Arc<dyn GitHubApi>,
    engine: ScoringEngine,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(github: impl GitHubApi + 'static, config: PipelineConfig) -> Self {
        Self {
            github: Arc::new(github),
            engine: ScoringEngine::new(),
            config,
        }
    }

    pub async fn analyze(&self, profile_url: &str) -> Result<ScoreReport> {
        let username = extract_username(profile_url)?;
        tracing::info!("Analyzing profile: {}", username);

        let evidence = self.fetch_evidence(&username).await?;
        Ok(self.engine.score(&evidence))
    }

    /// Builds the evidence bundle. The user and repo-listing calls are
    /// strict; everything after them is best-effort and degrades to empty
    /// values instead of failing the request.
    pub async fn fetch_evidence(&self, username: &str) -> Result<ProfileEvidence> {
        let user = self.github.get_user(username).await?;
        let all_repos = self.github.get_user_repos(username).await?;

        // Target set: non-forks in listing order, at most 15.
        let target: Vec<Repository> = all_repos
            .iter()
            .filter(|r| !r.fork)
            .take(15)
            .cloned()
            .collect();

        tracing::info!(
            "Enriching {} of {} repositories for {}",
            target.len(),
            all_repos.len(),
            username
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));

        let enrich_futures: Vec<_> = target
            .into_iter()
            .map(|repo| {
                let github = Arc::clone(&self.github);
                let semaphore = Arc::clone(&semaphore);
                let username = username.to_string();

                async move {
                    let _permit = semaphore.acquire().await.ok();

                    let (readme, weekly_commits, languages, files) = tokio::join!(
                        github.get_readme(&username, &repo.name),
                        github.get_weekly_participation(&username, &repo.name),
                        github.get_languages(&repo.languages_url),
                        github.get_contents(&username, &repo.name),
                    );

                    EnrichedRepository {
                        repo,
                        readme,
                        weekly_commits,
                        languages,
                        files,
                    }
                }
            })
            .collect();

        // join_all preserves the listing order of the target set no matter
        // which task finishes first.
        let (pinned_repos, pr_count, repos) = tokio::join!(
            self.github.get_pinned_repos(username),
            self.github.count_pull_requests(username),
            join_all(enrich_futures),
        );

        tracing::debug!(
            "Evidence for {}: {} enriched repos, {} pinned, {} PRs",
            username,
            repos.len(),
            pinned_repos.len(),
            pr_count
        );

        Ok(ProfileEvidence {
            user,
            repos,
            total_repos: all_repos.len(),
            pr_count,
            all_repos,
            pinned_repos,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::Error;
    use crate::models::{GitHubUser, PinnedRepository};

    struct StubGitHub {
        rate_limited: bool,
        repos: Vec<Repository>,
        /// Repos whose optional endpoints all fail.
        broken: Vec<String>,
        repo_list_calls: Arc<AtomicUsize>,
    }

    impl StubGitHub {
        fn with_repos(repos: Vec<Repository>) -> Self {
            Self {
                rate_limited: false,
                repos,
                broken: Vec::new(),
                repo_list_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn is_broken(&self, repo: &str) -> bool {
            self.broken.iter().any(|b| b == repo)
        }
    }

    fn stub_repo(name: &str, fork: bool) -> Repository {
        Repository {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            fork,
            topics: vec!["testing".to_string()],
            stargazers_count: 1,
            forks_count: 0,
            language: Some("Rust".to_string()),
            languages_url: format!("https://api.example.com/repos/{}/languages", name),
            pushed_at: None,
        }
    }

    #[async_trait]
    impl GitHubApi for StubGitHub {
        async fn get_user(&self, username: &str) -> crate::error::Result<GitHubUser> {
            if self.rate_limited {
                return Err(Error::RateLimited);
            }
            Ok(GitHubUser {
                login: username.to_string(),
                name: None,
                avatar_url: String::new(),
                bio: None,
                public_repos: self.repos.len() as u32,
                followers: 0,
            })
        }

        async fn get_user_repos(&self, _username: &str) -> crate::error::Result<Vec<Repository>> {
            self.repo_list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.repos.clone())
        }

        async fn get_readme(&self, _username: &str, repo: &str) -> Option<String> {
            if self.is_broken(repo) {
                return None;
            }
            Some(format!("# {}\n\nInstallation and usage notes.", repo))
        }

        async fn get_weekly_participation(&self, _username: &str, repo: &str) -> Vec<u32> {
            if self.is_broken(repo) {
                return Vec::new();
            }
            vec![1; 52]
        }

        async fn get_languages(&self, languages_url: &str) -> HashMap<String, u64> {
            if languages_url.is_empty() {
                return HashMap::new();
            }
            HashMap::from([("Rust".to_string(), 100)])
        }

        async fn get_contents(&self, _username: &str, repo: &str) -> Vec<String> {
            if self.is_broken(repo) {
                return Vec::new();
            }
            vec!["Cargo.toml".to_string(), "src".to_string()]
        }

        async fn count_pull_requests(&self, _username: &str) -> u64 {
            7
        }

        async fn get_pinned_repos(&self, _username: &str) -> Vec<PinnedRepository> {
            vec![PinnedRepository {
                name: "showcase".to_string(),
                description: Some("pinned".to_string()),
                stars: 5,
                language: Some("Rust".to_string()),
                language_color: None,
                languages: HashMap::new(),
            }]
        }
    }

    fn pipeline(stub: StubGitHub) -> AnalysisPipeline {
        AnalysisPipeline::new(
            stub,
            PipelineConfig {
                concurrency_limit: 4,
            },
        )
    }

    #[tokio::test]
    async fn test_rate_limited_user_fetch_stops_pipeline() {
        let stub = StubGitHub {
            rate_limited: true,
            ..StubGitHub::with_repos(vec![stub_repo("a", false)])
        };
        let repo_list_calls = Arc::clone(&stub.repo_list_calls);
        let pipeline = pipeline(stub);

        let err = pipeline.analyze("alice").await.unwrap_err();
        assert!(matches!(err, Error::RateLimited));
        assert_eq!(
            err.to_string(),
            "GitHub API rate limit exceeded. Please add a GITHUB_TOKEN to your server .env file."
        );

        // The repo listing must not have been attempted.
        assert_eq!(repo_list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_profile_url_rejected() {
        let pipeline = pipeline(StubGitHub::with_repos(Vec::new()));
        let err = pipeline.analyze("https://github.com/").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_forks_filtered_and_target_truncated_to_15() {
        // 20 repos, every fourth one a fork.
        let repos: Vec<_> = (0..20)
            .map(|i| stub_repo(&format!("repo{:02}", i), i % 4 == 3))
            .collect();
        let pipeline = pipeline(StubGitHub::with_repos(repos));

        let evidence = pipeline.fetch_evidence("alice").await.unwrap();

        assert_eq!(evidence.total_repos, 20);
        assert_eq!(evidence.all_repos.len(), 20);
        assert_eq!(evidence.repos.len(), 15);
        assert!(evidence.repos.iter().all(|r| !r.repo.fork));

        // Listing order is preserved through the fan-out.
        let names: Vec<&str> = evidence.repos.iter().map(|r| r.repo.name.as_str()).collect();
        let expected: Vec<String> = (0..20)
            .filter(|i| i % 4 != 3)
            .take(15)
            .map(|i| format!("repo{:02}", i))
            .collect();
        assert_eq!(names, expected.iter().map(String::as_str).collect::<Vec<_>>());

        assert_eq!(evidence.pr_count, 7);
        assert_eq!(evidence.pinned_repos.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_enrichment_failure_keeps_repo_in_place() {
        let repos = vec![
            stub_repo("first", false),
            stub_repo("flaky", false),
            stub_repo("third", false),
        ];
        let stub = StubGitHub {
            broken: vec!["flaky".to_string()],
            ..StubGitHub::with_repos(repos)
        };
        let pipeline = pipeline(stub);

        let evidence = pipeline.fetch_evidence("alice").await.unwrap();
        assert_eq!(evidence.repos.len(), 3);

        let flaky = &evidence.repos[1];
        assert_eq!(flaky.repo.name, "flaky");
        assert!(flaky.readme.is_none());
        assert!(flaky.weekly_commits.is_empty());
        assert!(flaky.files.is_empty());
        // languages_url is still valid, so the language map survives.
        assert!(!flaky.languages.is_empty());

        let report = ScoringEngine::new().score(&evidence);
        let top_names: Vec<&str> = report
            .top_repositories
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(top_names, vec!["first", "flaky", "third"]);
    }

    #[tokio::test]
    async fn test_analyze_produces_report_with_user_echo() {
        let pipeline = pipeline(StubGitHub::with_repos(vec![stub_repo("solo", false)]));
        let report = pipeline
            .analyze("https://github.com/alice/")
            .await
            .unwrap();

        assert_eq!(report.user.login, "alice");
        assert_eq!(report.total_score, report.breakdown.total());
        assert_eq!(report.pinned_repositories.len(), 1);
        assert_eq!(report.pinned_repositories[0].insight, "Pinned Repository");
    }
}
