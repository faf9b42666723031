use atl_core::{Method, Result, Transport, decode, to_body};
use tracing::instrument;

use crate::client::JiraClient;
use crate::models::{AddCommentRequest, Comment, Comments};

impl<T: Transport> JiraClient<T> {
  /// Get the comments on an issue
  #[instrument(skip(self), level = "debug")]
  pub async fn get_comments(&self, issue_key: &str) -> Result<Comments> {
    let data = self
      .rest
      .request(Method::GET, &format!("/issue/{issue_key}/comment"), None)
      .await?;
    decode(&data, "comments")
  }

  /// Add a plain-text comment to an issue
  #[instrument(skip(self, body), level = "debug")]
  pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<Comment> {
    let request = to_body(&AddCommentRequest { body })?;
    let data = self
      .rest
      .request(Method::POST, &format!("/issue/{issue_key}/comment"), Some(&request))
      .await?;
    decode(&data, "comment")
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Result;
  use serde_json::json;
  use wiremock::matchers::{body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::endpoints::test_support::stub_client;
  use crate::models::DeploymentMode;

  #[tokio::test]
  async fn test_get_comments() -> Result<()> {
    let (client, transport) = stub_client(DeploymentMode::Cloud);
    transport.push_json(json!({
        "comments": [
            {
                "id": "100",
                "body": "Looks good",
                "author": { "displayName": "Grace Hopper" },
                "created": "2024-03-01T10:15:00.000+0000"
            }
        ],
        "total": 1
    }));

    let comments = client.get_comments("TEST-1").await?;
    assert_eq!(comments.total, 1);
    assert_eq!(comments.comments[0].body, "Looks good");
    assert_eq!(
      comments.comments[0].author.as_ref().map(|a| a.display_name.as_str()),
      Some("Grace Hopper")
    );
    assert_eq!(transport.requests()[0].path, "/issue/TEST-1/comment");
    assert_eq!(transport.requests()[0].body, None);

    Ok(())
  }

  #[tokio::test]
  async fn test_add_comment() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::new(&mock_server.uri(), "test_token", DeploymentMode::Cloud)?;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/TEST-1/comment"))
      .and(body_json(json!({ "body": "Deployed to staging" })))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({
          "id": "101",
          "body": "Deployed to staging",
          "created": "2024-03-02T08:00:00.000+0000"
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let comment = client.add_comment("TEST-1", "Deployed to staging").await?;
    assert_eq!(comment.id, "101");

    Ok(())
  }
}
