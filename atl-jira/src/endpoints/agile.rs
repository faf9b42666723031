use atl_core::url::with_query;
use atl_core::{Method, Result, Transport, decode, to_body};
use serde::Serialize;
use tracing::instrument;

use crate::client::JiraClient;
use crate::consts::{BOARD_LIMIT, SPRINT_LIMIT};
use crate::models::{Board, Paged, Sprint};

#[derive(Debug, Serialize)]
struct MoveToSprintRequest<'a> {
  issues: &'a [String],
}

impl<T: Transport> JiraClient<T> {
  /// List agile boards, optionally only those of one project
  #[instrument(skip(self), level = "debug")]
  pub async fn get_boards(&self, project: Option<&str>) -> Result<Paged<Board>> {
    let mut params = vec![("maxResults", BOARD_LIMIT)];
    if let Some(project) = project {
      params.push(("projectKeyOrId", project));
    }

    let data = self
      .agile
      .request(Method::GET, &with_query("/board", &params), None)
      .await?;
    decode(&data, "boards")
  }

  /// List the sprints of a board, optionally filtered by state
  /// (`active`, `future`, `closed`)
  #[instrument(skip(self), level = "debug")]
  pub async fn get_sprints(&self, board_id: u64, state: Option<&str>) -> Result<Paged<Sprint>> {
    let mut params = vec![("maxResults", SPRINT_LIMIT)];
    if let Some(state) = state {
      params.push(("state", state));
    }

    let path = with_query(&format!("/board/{board_id}/sprint"), &params);
    let data = self.agile.request(Method::GET, &path, None).await?;
    decode(&data, "sprints")
  }

  /// Move issues into a sprint
  #[instrument(skip(self), level = "debug")]
  pub async fn move_to_sprint(&self, sprint_id: u64, issue_keys: &[String]) -> Result<()> {
    let body = to_body(&MoveToSprintRequest { issues: issue_keys })?;
    self
      .agile
      .request(Method::POST, &format!("/sprint/{sprint_id}/issue"), Some(&body))
      .await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Result;
  use serde_json::json;
  use wiremock::matchers::{body_json, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::endpoints::test_support::stub_client;
  use crate::models::DeploymentMode;

  #[tokio::test]
  async fn test_get_boards_for_project() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::new(&mock_server.uri(), "test_token", DeploymentMode::Cloud)?;

    Mock::given(method("GET"))
      .and(path("/rest/agile/1.0/board"))
      .and(query_param("maxResults", "100"))
      .and(query_param("projectKeyOrId", "TEST"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "maxResults": 100,
          "startAt": 0,
          "total": 1,
          "isLast": true,
          "values": [
              {
                  "id": 7,
                  "name": "TEST board",
                  "type": "scrum",
                  "location": { "projectId": 10000, "projectKey": "TEST", "projectName": "Test Project" }
              }
          ]
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let boards = client.get_boards(Some("TEST")).await?;
    assert!(boards.is_last);
    assert_eq!(boards.values[0].board_type, "scrum");
    assert_eq!(boards.values[0].project_key(), Some("TEST"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_boards_uses_agile_root() -> Result<()> {
    let (client, transport) = stub_client(DeploymentMode::Cloud);
    transport.push_json(json!({ "values": [] }));

    let boards = client.get_boards(None).await?;
    assert!(boards.values.is_empty());

    let request = &transport.requests()[0];
    assert_eq!(request.root, "agile");
    assert_eq!(request.path, "/board?maxResults=100");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_sprints_with_state() -> Result<()> {
    let (client, transport) = stub_client(DeploymentMode::Cloud);
    transport.push_json(json!({
        "maxResults": 50,
        "isLast": true,
        "values": [
            { "id": 42, "name": "Sprint 42", "state": "active", "startDate": "2024-03-01T09:00:00.000Z", "originBoardId": 7 }
        ]
    }));

    let sprints = client.get_sprints(7, Some("active")).await?;
    assert_eq!(sprints.values[0].id, 42);
    assert_eq!(sprints.values[0].origin_board_id, Some(7));
    assert_eq!(sprints.values[0].end_date, None);
    assert_eq!(transport.requests()[0].path, "/board/7/sprint?maxResults=50&state=active");

    Ok(())
  }

  #[tokio::test]
  async fn test_move_to_sprint() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::new(&mock_server.uri(), "test_token", DeploymentMode::Cloud)?;

    Mock::given(method("POST"))
      .and(path("/rest/agile/1.0/sprint/42/issue"))
      .and(body_json(json!({ "issues": ["TEST-1", "TEST-2"] })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client
      .move_to_sprint(42, &["TEST-1".to_string(), "TEST-2".to_string()])
      .await?;

    Ok(())
  }
}
