use atl_core::{BearerAuth, RestTransport, Result, Transport};

use crate::consts::{AGILE_API_ROOT, REST_API_ROOT};
use crate::models::DeploymentMode;

/// Represents a Jira API client.
///
/// Holds one transport for the REST API and one for the Agile API. Both point
/// at the same host and share credentials; the type parameter lets tests swap
/// in an in-memory transport.
#[derive(Debug, Clone)]
pub struct JiraClient<T = RestTransport> {
  pub(crate) rest: T,
  pub(crate) agile: T,
  pub(crate) mode: DeploymentMode,
}

impl JiraClient<RestTransport> {
  /// Create a new Jira client for `base_url` authenticated with a bearer
  /// token
  pub fn new(base_url: &str, token: &str, mode: DeploymentMode) -> Result<Self> {
    let rest = RestTransport::new(base_url, REST_API_ROOT, BearerAuth::new(token))?;
    let agile = rest.for_root(AGILE_API_ROOT);
    Ok(Self::with_transports(rest, agile, mode))
  }

  /// Normalized base URL the client talks to
  pub fn base_url(&self) -> &str {
    self.rest.base_url()
  }

  /// Browser URL of an issue
  pub fn browse_url(&self, issue_key: &str) -> String {
    format!("{}/browse/{}", self.base_url(), issue_key)
  }
}

impl<T: Transport> JiraClient<T> {
  /// Create a client from already-built transports
  pub fn with_transports(rest: T, agile: T, mode: DeploymentMode) -> Self {
    Self { rest, agile, mode }
  }

  /// Deployment mode this client was built for
  pub fn mode(&self) -> DeploymentMode {
    self.mode
  }
}

/// Create a Jira client from a base URL and token
pub fn create_jira_client(base_url: &str, token: &str, mode: DeploymentMode) -> Result<JiraClient> {
  JiraClient::new(base_url, token, mode)
}

#[cfg(test)]
mod tests {
  use anyhow::Result;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  #[test]
  fn test_jira_client_creation() -> Result<()> {
    let client = JiraClient::new("jira.example.com/", "test_token", DeploymentMode::Server)?;

    assert_eq!(client.base_url(), "https://jira.example.com");
    assert_eq!(client.rest.api_root(), "/rest/api/2");
    assert_eq!(client.agile.api_root(), "/rest/agile/1.0");
    assert_eq!(client.mode(), DeploymentMode::Server);
    assert_eq!(client.browse_url("TEST-1"), "https://jira.example.com/browse/TEST-1");

    Ok(())
  }

  #[test]
  fn test_jira_client_rejects_bad_url() {
    assert!(JiraClient::new("   ", "token", DeploymentMode::Cloud).is_err());
  }

  /// Both API roots carry the same bearer token
  #[tokio::test]
  async fn test_jira_client_auth_on_both_roots() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-1/comment"))
      .and(header("Authorization", "Bearer test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "comments": [], "total": 0 })))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/rest/agile/1.0/board"))
      .and(header("Authorization", "Bearer test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "values": [] })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = create_jira_client(&mock_server.uri(), "test_token", DeploymentMode::Cloud)?;
    client.get_comments("TEST-1").await?;
    client.get_boards(None).await?;

    Ok(())
  }
}
