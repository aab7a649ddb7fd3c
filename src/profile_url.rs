use crate::error::{Error, Result};

/// Extracts a GitHub username from a free-form profile URL.
///
/// Accepts `https://github.com/alice`, `github.com/alice`, `www.github.com/alice`
/// or a bare `alice`. The character set is not validated here; an unknown
/// username surfaces as a 404 from the user lookup.
pub fn extract_username(profile_url: &str) -> Result<String> {
    let mut rest = profile_url.trim();

    rest = rest
        .strip_prefix("https://")
        .or_else(|| rest.strip_prefix("http://"))
        .unwrap_or(rest);
    rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest = rest.strip_prefix("github.com/").unwrap_or(rest);
    rest = rest.strip_suffix('/').unwrap_or(rest);

    // Drop query parameters and fragments.
    let username = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    if username.is_empty() {
        return Err(Error::InvalidInput(
            "Invalid GitHub profile URL".to_string(),
        ));
    }

    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_username_variants() {
        assert_eq!(
            extract_username("https://github.com/alice/").unwrap(),
            "alice"
        );
        assert_eq!(
            extract_username("github.com/alice?tab=repos").unwrap(),
            "alice"
        );
        assert_eq!(extract_username("alice#foo").unwrap(), "alice");
        assert_eq!(
            extract_username("www.github.com/alice/").unwrap(),
            "alice"
        );
        assert_eq!(extract_username("alice").unwrap(), "alice");
    }

    #[test]
    fn test_extract_username_rejects_empty() {
        assert!(matches!(
            extract_username(""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            extract_username("https://github.com/"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extract_username_idempotent() {
        for input in ["https://github.com/alice/", "github.com/bob?x=1", "carol"] {
            let once = extract_username(input).unwrap();
            let twice = extract_username(&once).unwrap();
            assert_eq!(once, twice);
        }
    }
}
