use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// Per-dimension integer scores. Caps: documentation 20, structure 15,
/// activity 20, organization 15, impact 15, depth 15 (sum 100).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub documentation_quality: u32,
    pub code_structure: u32,
    pub activity_consistency: u32,
    pub repository_organization: u32,
    pub project_impact: u32,
    pub technical_depth: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.documentation_quality
            + self.code_structure
            + self.activity_consistency
            + self.repository_organization
            + self.project_impact
            + self.technical_depth
    }
}

/// A strength or red flag with the repositories it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub message: String,
    pub affected_repos: Vec<String>,
}

impl Flag {
    pub fn new(message: impl Into<String>, affected_repos: Vec<String>) -> Self {
        Self {
            message: message.into(),
            affected_repos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message: String,
    pub repo: String,
}

impl Suggestion {
    pub fn new(message: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            repo: repo.into(),
        }
    }
}

/// One entry of `topRepositories` / `pinnedRepositories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoHighlight {
    pub name: String,
    pub description: Option<String>,
    pub stars: u32,
    pub primary_language: Option<String>,
    pub insight: String,
}

/// The external response of `POST /api/analyze`. Key names are stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
    pub strengths: Vec<Flag>,
    pub red_flags: Vec<Flag>,
    pub actionable_suggestions: Vec<Suggestion>,
    pub top_repositories: Vec<RepoHighlight>,
    pub pinned_repositories: Vec<RepoHighlight>,
    pub user: UserSummary,
}
