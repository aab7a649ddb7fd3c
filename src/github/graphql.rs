use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::models::PinnedRepository;

const PINNED_QUERY: &str = r#"
query PinnedRepos($login: String!) {
  user(login: $login) {
    pinnedItems(first: 6, types: REPOSITORY) {
      nodes {
        ... on Repository {
          name
          description
          stargazers {
            totalCount
          }
          primaryLanguage {
            name
            color
          }
          languages(first: 5) {
            nodes {
              name
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
}

#[derive(Deserialize)]
struct GraphQlData {
    user: Option<PinnedUser>,
}

#[derive(Deserialize)]
struct PinnedUser {
    #[serde(rename = "pinnedItems")]
    pinned_items: PinnedItems,
}

#[derive(Deserialize)]
struct PinnedItems {
    nodes: Vec<PinnedNode>,
}

#[derive(Deserialize)]
struct PinnedNode {
    name: String,
    description: Option<String>,
    stargazers: StargazerCount,
    #[serde(rename = "primaryLanguage")]
    primary_language: Option<LanguageInfo>,
    #[serde(default)]
    languages: Option<LanguageConnection>,
}

#[derive(Deserialize)]
struct StargazerCount {
    #[serde(rename = "totalCount")]
    total_count: u32,
}

#[derive(Deserialize)]
struct LanguageInfo {
    name: String,
    color: Option<String>,
}

#[derive(Deserialize)]
struct LanguageConnection {
    nodes: Vec<LanguageName>,
}

#[derive(Deserialize)]
struct LanguageName {
    name: String,
}

/// Fetches the user's pinned repositories. The GraphQL endpoint takes a
/// bearer token even when the REST side uses the `token` scheme.
pub async fn fetch_pinned(
    client: &Client,
    graphql_url: &str,
    token: &str,
    username: &str,
) -> Result<Vec<PinnedRepository>> {
    tracing::debug!("Fetching pinned repos for: {}", username);

    let body = json!({
        "query": PINNED_QUERY,
        "variables": { "login": username },
    });

    let response = client
        .post(graphql_url)
        .header("Authorization", format!("bearer {}", token))
        .json(&body)
        .send()
        .await?;

    let parsed: GraphQlResponse = response.json().await?;

    let nodes = parsed
        .data
        .and_then(|d| d.user)
        .map(|u| u.pinned_items.nodes)
        .unwrap_or_default();

    Ok(nodes.into_iter().map(into_pinned).collect())
}

fn into_pinned(node: PinnedNode) -> PinnedRepository {
    let (language, language_color) = match node.primary_language {
        Some(lang) => (Some(lang.name), lang.color),
        None => (None, None),
    };

    let languages = node
        .languages
        .map(|conn| conn.nodes.into_iter().map(|l| (l.name, 1)).collect())
        .unwrap_or_default();

    PinnedRepository {
        name: node.name,
        description: node.description,
        stars: node.stargazers.total_count,
        language,
        language_color,
        languages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pinned_response() {
        let raw = r##"{
            "data": {
                "user": {
                    "pinnedItems": {
                        "nodes": [
                            {
                                "name": "demo",
                                "description": "A demo",
                                "stargazers": { "totalCount": 42 },
                                "primaryLanguage": { "name": "Rust", "color": "#dea584" },
                                "languages": { "nodes": [{ "name": "Rust" }, { "name": "Shell" }] }
                            },
                            {
                                "name": "bare",
                                "description": null,
                                "stargazers": { "totalCount": 0 },
                                "primaryLanguage": null,
                                "languages": null
                            }
                        ]
                    }
                }
            }
        }"##;

        let parsed: GraphQlResponse = serde_json::from_str(raw).unwrap();
        let pinned: Vec<_> = parsed
            .data
            .and_then(|d| d.user)
            .map(|u| u.pinned_items.nodes)
            .unwrap_or_default()
            .into_iter()
            .map(into_pinned)
            .collect();

        assert_eq!(pinned.len(), 2);
        assert_eq!(pinned[0].name, "demo");
        assert_eq!(pinned[0].stars, 42);
        assert_eq!(pinned[0].language.as_deref(), Some("Rust"));
        assert_eq!(pinned[0].language_color.as_deref(), Some("#dea584"));
        assert_eq!(pinned[0].languages.len(), 2);
        assert_eq!(pinned[1].language, None);
        assert!(pinned[1].languages.is_empty());
    }

    #[test]
    fn test_parse_error_response_yields_empty() {
        let raw = r#"{ "data": null }"#;
        let parsed: GraphQlResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.data.and_then(|d| d.user).is_none());
    }
}
