//! URL helpers shared across crates.
//!
//! Base URLs come from the environment or a config file, so they are
//! normalized once here: whitespace trimmed, a missing scheme defaulted to
//! `https://`, and trailing slashes stripped so that endpoint paths can be
//! appended verbatim.

use url::Url;

use crate::error::{ApiError, Result};

/// Normalize a product base URL for path concatenation.
///
/// Keeps any context path (`https://host/jira`) but drops trailing slashes,
/// query strings and fragments.
pub fn normalize_base_url(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(invalid(input, "base URL cannot be empty"));
  }

  let candidate = if has_http_scheme(trimmed) {
    trimmed.to_string()
  } else {
    format!("https://{}", trimmed.trim_start_matches('/'))
  };

  let url = Url::parse(&candidate).map_err(|e| invalid(input, &e.to_string()))?;
  if url.host_str().is_none() {
    return Err(invalid(input, "missing host"));
  }

  let mut normalized = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
  if let Some(port) = url.port() {
    normalized.push_str(&format!(":{port}"));
  }
  normalized.push_str(url.path().trim_end_matches('/'));

  Ok(normalized)
}

/// Append a query string built from key/value pairs to a path.
///
/// Values are form-urlencoded, so JQL and CQL pass through verbatim.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
  if params.is_empty() {
    return path.to_string();
  }

  let query = url::form_urlencoded::Serializer::new(String::new())
    .extend_pairs(params)
    .finish();
  format!("{path}?{query}")
}

fn has_http_scheme(input: &str) -> bool {
  let lowered = input.to_ascii_lowercase();
  lowered.starts_with("http://") || lowered.starts_with("https://")
}

fn invalid(input: &str, reason: &str) -> ApiError {
  ApiError::InvalidUrl {
    url: input.to_string(),
    reason: reason.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;

  #[test_case("https://jira.example.com", "https://jira.example.com" ; "already normalized")]
  #[test_case("https://jira.example.com/", "https://jira.example.com" ; "trailing slash")]
  #[test_case("https://jira.example.com///", "https://jira.example.com" ; "several trailing slashes")]
  #[test_case("  https://jira.example.com/  ", "https://jira.example.com" ; "surrounding whitespace")]
  #[test_case("jira.example.com", "https://jira.example.com" ; "missing scheme")]
  #[test_case("http://localhost:8080/", "http://localhost:8080" ; "http with port")]
  #[test_case("https://example.com/wiki/", "https://example.com/wiki" ; "context path")]
  fn test_normalize_base_url(input: &str, expected: &str) {
    assert_eq!(normalize_base_url(input).unwrap(), expected);
  }

  #[test]
  fn test_normalize_base_url_rejects_empty() {
    let err = normalize_base_url("   ").unwrap_err();
    assert!(err.to_string().contains("cannot be empty"));
  }

  #[test]
  fn test_with_query_encodes_values() {
    let path = with_query(
      "/search",
      &[("jql", "project = ABC AND status = \"In Progress\""), ("maxResults", "50")],
    );
    assert_eq!(
      path,
      "/search?jql=project+%3D+ABC+AND+status+%3D+%22In+Progress%22&maxResults=50"
    );
  }

  #[test]
  fn test_with_query_without_params() {
    assert_eq!(with_query("/field", &[]), "/field");
  }
}
