use crate::models::{EnrichedRepository, PinnedRepository, RepoHighlight};

/// One-line label for a repository card. The ladder order is deliberate:
/// a missing description wins over README state, which wins over staleness.
pub fn repo_insight(repo: &EnrichedRepository) -> &'static str {
    if !repo.has_description() {
        return "Missing description";
    }

    match repo.readme.as_deref() {
        Some(readme) if readme.chars().count() < 100 => return "README too short",
        Some(_) => {}
        None => return "Missing README",
    }

    if !repo.weekly_commits.is_empty() && repo.recent_commits() == 0 {
        return "No commits in last 90 days";
    }

    "Active repository"
}

/// The first five target-set repos, in listing order.
pub fn top_repositories(repos: &[EnrichedRepository]) -> Vec<RepoHighlight> {
    repos
        .iter()
        .take(5)
        .map(|r| RepoHighlight {
            name: r.repo.name.clone(),
            description: r.repo.description.clone(),
            stars: r.repo.stargazers_count,
            primary_language: r.repo.language.clone(),
            insight: repo_insight(r).to_string(),
        })
        .collect()
}

pub fn pinned_highlights(pinned: &[PinnedRepository]) -> Vec<RepoHighlight> {
    pinned
        .iter()
        .map(|r| RepoHighlight {
            name: r.name.clone(),
            description: r.description.clone(),
            stars: r.stars,
            primary_language: r.language.clone(),
            insight: "Pinned Repository".to_string(),
        })
        .collect()
}
