use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::insight;
use crate::models::{
    EnrichedRepository, Flag, ProfileEvidence, Repository, ScoreBreakdown, ScoreReport,
    Suggestion, UserSummary,
};

/// Files at the repo root that signal a recognized build or dependency setup.
/// Matched as a substring of the file name, case-insensitive.
static CONFIG_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)package\.json|requirements\.txt|pom\.xml|build\.gradle|go\.mod|cargo\.toml|composer\.json|makefile",
    )
    .expect("config file regex")
});

/// Deterministic scoring over an evidence bundle. Six integer dimensions
/// capped at 20/15/20/15/15/15, plus strengths, red flags and a deduplicated
/// suggestion list capped at 5. Running it twice on the same evidence yields
/// an identical report.
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, evidence: &ProfileEvidence) -> ScoreReport {
        let repos = &evidence.repos;
        // Divisor guard: with no repos every numerator is 0 and the scores
        // fall to 0 rather than dividing by zero.
        let n = repos.len().max(1) as f64;

        let mut strengths = Vec::new();
        let mut red_flags = Vec::new();
        let mut suggestions = Vec::new();

        let breakdown = ScoreBreakdown {
            documentation_quality: self.score_documentation(
                repos,
                n,
                &mut suggestions,
                &mut red_flags,
            ),
            code_structure: self.score_structure(repos, n, &mut suggestions),
            activity_consistency: self.score_activity(repos, &mut suggestions, &mut red_flags),
            repository_organization: self.score_organization(
                repos,
                n,
                &mut suggestions,
                &mut red_flags,
            ),
            project_impact: self.score_impact(&evidence.all_repos, &mut strengths),
            technical_depth: self.score_depth(repos),
        };

        ScoreReport {
            total_score: breakdown.total(),
            breakdown,
            strengths,
            red_flags,
            actionable_suggestions: finalize_suggestions(suggestions, repos),
            top_repositories: insight::top_repositories(repos),
            pinned_repositories: insight::pinned_highlights(&evidence.pinned_repos),
            user: UserSummary::from(&evidence.user),
        }
    }

    /// Documentation quality, cap 20. Per repo: +2 README present, +2 longer
    /// than 300 chars, +3 installation/setup section, +3 usage/getting
    /// started section; the per-repo average is doubled and capped.
    fn score_documentation(
        &self,
        repos: &[EnrichedRepository],
        n: f64,
        suggestions: &mut Vec<Suggestion>,
        red_flags: &mut Vec<Flag>,
    ) -> u32 {
        let mut readme_raw = 0u32;

        for repo in repos {
            let name = &repo.repo.name;
            match repo.readme.as_deref() {
                Some(readme) => {
                    let content = readme.to_lowercase();
                    let has_install =
                        content.contains("installation") || content.contains("setup");
                    let has_usage =
                        content.contains("usage") || content.contains("getting started");

                    let mut score = 2;
                    if content.chars().count() > 300 {
                        score += 2;
                    }
                    if has_install {
                        score += 3;
                    }
                    if has_usage {
                        score += 3;
                    }
                    readme_raw += score;

                    let mut missing = Vec::new();
                    if !has_install {
                        missing.push("Installation");
                    }
                    if !has_usage {
                        missing.push("Usage");
                    }
                    if !missing.is_empty() {
                        suggestions.push(Suggestion::new(
                            format!(
                                "Add {} section(s) in README of repository '{}'.",
                                missing.join(" and "),
                                name
                            ),
                            name,
                        ));
                    }
                }
                None => {
                    suggestions.push(Suggestion::new(
                        format!(
                            "Add a README file to repository '{}' to explain what it does.",
                            name
                        ),
                        name,
                    ));
                }
            }
        }

        let component = cap(20, (readme_raw as f64 / n) * 2.0);

        if component < 10 && !repos.is_empty() {
            let poor: Vec<String> = repos
                .iter()
                .filter(|r| r.readme.is_none() || r.readme_chars() < 200)
                .map(|r| r.repo.name.clone())
                .collect();
            red_flags.push(Flag::new(
                "Low documentation quality across repositories.",
                poor,
            ));
        }

        component
    }

    /// Code structure, cap 15: one point per repo with a recognized config
    /// file at the top level.
    fn score_structure(
        &self,
        repos: &[EnrichedRepository],
        n: f64,
        suggestions: &mut Vec<Suggestion>,
    ) -> u32 {
        let mut with_config = 0u32;

        for repo in repos {
            if repo.files.iter().any(|f| CONFIG_FILE.is_match(f)) {
                with_config += 1;
            } else {
                suggestions.push(Suggestion::new(
                    format!(
                        "Add a standard config file (package.json, requirements.txt, etc.) to '{}'.",
                        repo.repo.name
                    ),
                    &repo.repo.name,
                ));
            }
        }

        cap(15, (with_config as f64 / n) * 15.0)
    }

    /// Activity consistency, cap 20, over the last 13 weekly buckets of every
    /// target repo. More than 50 recent commits maxes the dimension outright.
    fn score_activity(
        &self,
        repos: &[EnrichedRepository],
        suggestions: &mut Vec<Suggestion>,
        red_flags: &mut Vec<Flag>,
    ) -> u32 {
        let mut total_commits = 0u64;
        let mut inactive = Vec::new();

        for repo in repos {
            let recent = repo.recent_commits();
            total_commits += u64::from(recent);
            if recent == 0 {
                inactive.push(repo.repo.name.clone());
            }
        }

        let component = if total_commits > 50 {
            20
        } else {
            cap(20, total_commits as f64 / 2.5)
        };

        if let Some(first_inactive) = inactive.first().cloned() {
            red_flags.push(Flag::new(
                "Repositories with no commits in last 90 days.",
                inactive,
            ));
            suggestions.push(Suggestion::new(
                format!(
                    "Resume activity on '{}' or consider archiving it.",
                    first_inactive
                ),
                first_inactive,
            ));
        }

        component
    }

    /// Repository organization, cap 15: +1 description, +1 topics per repo.
    fn score_organization(
        &self,
        repos: &[EnrichedRepository],
        n: f64,
        suggestions: &mut Vec<Suggestion>,
        red_flags: &mut Vec<Flag>,
    ) -> u32 {
        let mut organized = 0u32;
        let mut missing_desc = Vec::new();

        for repo in repos {
            let name = &repo.repo.name;
            if repo.has_description() {
                organized += 1;
            } else {
                missing_desc.push(name.clone());
                suggestions.push(Suggestion::new(
                    format!("Add a short description to repository '{}'.", name),
                    name,
                ));
            }

            if !repo.repo.topics.is_empty() {
                organized += 1;
            } else {
                suggestions.push(Suggestion::new(
                    format!(
                        "Add topics (tags) to repository '{}' for better discoverability.",
                        name
                    ),
                    name,
                ));
            }
        }

        let component = cap(15, (organized as f64 / (n * 2.0)) * 15.0);

        if !missing_desc.is_empty() {
            red_flags.push(Flag::new("Repositories without description.", missing_desc));
        }

        component
    }

    /// Project impact, cap 15, from star and fork totals over the full
    /// listing (not just the target set). Both thresholds are strict.
    fn score_impact(&self, all_repos: &[Repository], strengths: &mut Vec<Flag>) -> u32 {
        let stars_total: u64 = all_repos.iter().map(|r| u64::from(r.stargazers_count)).sum();
        let forks_total: u64 = all_repos.iter().map(|r| u64::from(r.forks_count)).sum();

        let star_points = if stars_total > 50 {
            10.0
        } else {
            stars_total as f64 / 5.0
        };
        let fork_points = if forks_total > 10 {
            5.0
        } else {
            forks_total as f64 / 2.0
        };

        if stars_total > 100 {
            strengths.push(Flag::new("Strong project impact (High Stars)", Vec::new()));
        }

        cap(15, star_points + fork_points)
    }

    /// Technical depth, cap 15: 3 points per distinct language across the
    /// target set's language breakdowns.
    fn score_depth(&self, repos: &[EnrichedRepository]) -> u32 {
        let languages: HashSet<&str> = repos
            .iter()
            .flat_map(|r| r.languages.keys())
            .map(String::as_str)
            .collect();

        (3 * languages.len() as u32).min(15)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Half-away-from-zero rounding capped to the dimension limit. All inputs
/// are non-negative, so `f64::round` gives exactly that.
fn cap(limit: u32, value: f64) -> u32 {
    (value.round() as u32).min(limit)
}

/// Deduplicates by `(message, repo)` keeping the first occurrence, tops up
/// with the three generic fallbacks when fewer than 3 remain, and truncates
/// to 5.
fn finalize_suggestions(
    suggestions: Vec<Suggestion>,
    repos: &[EnrichedRepository],
) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Suggestion> = Vec::new();

    for suggestion in suggestions {
        if seen.insert((suggestion.message.clone(), suggestion.repo.clone())) {
            unique.push(suggestion);
        }
    }

    if unique.len() < 3 {
        if let Some(first) = repos.first() {
            let name = &first.repo.name;
            unique.push(Suggestion::new(
                format!(
                    "Consider adding a CI/CD pipeline (GitHub Actions) to '{}'.",
                    name
                ),
                name,
            ));
            unique.push(Suggestion::new(
                format!("Add a license file to '{}' if missing.", name),
                name,
            ));
            unique.push(Suggestion::new(
                format!("Create a comprehensive 'CONTRIBUTING.md' for '{}'.", name),
                name,
            ));
        }
    }

    unique.truncate(5);
    unique
}
