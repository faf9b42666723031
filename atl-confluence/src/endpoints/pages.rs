use atl_core::url::with_query;
use atl_core::{Method, Result, Transport, decode, to_body};
use tracing::{info, instrument, warn};

use crate::client::ConfluenceClient;
use crate::consts::REVISE_EXPAND;
use crate::models::{CreatePageRequest, NewPage, Page, PageRevision, PageUpdate, UpdatePageRequest};

impl<T: Transport> ConfluenceClient<T> {
  /// Get a page by id, expanding the given properties
  #[instrument(skip(self), level = "debug")]
  pub async fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page> {
    let path = format!("/content/{page_id}");
    let path = if expand.is_empty() {
      path
    } else {
      let expand = expand.join(",");
      with_query(&path, &[("expand", expand.as_str())])
    };

    let data = self.api.request(Method::GET, &path, None).await?;
    decode(&data, "page")
  }

  /// Create a page in a space, optionally under a parent page
  #[instrument(skip(self), level = "debug")]
  pub async fn create_page(&self, page: &NewPage) -> Result<Page> {
    let body = to_body(&CreatePageRequest::new(page))?;
    let data = self.api.request(Method::POST, "/content", Some(&body)).await?;
    decode(&data, "created page")
  }

  /// Replace a page's title and body.
  ///
  /// `current_version` is the version the caller last read; the request
  /// submits the one after it.
  #[instrument(skip(self, update), level = "debug")]
  pub async fn update_page(&self, page_id: &str, update: &PageUpdate, current_version: u64) -> Result<Page> {
    let body = to_body(&UpdatePageRequest::new(update, current_version))?;
    let data = self
      .api
      .request(Method::PUT, &format!("/content/{page_id}"), Some(&body))
      .await?;
    decode(&data, "updated page")
  }

  /// Delete a page
  #[instrument(skip(self), level = "debug")]
  pub async fn delete_page(&self, page_id: &str) -> Result<()> {
    self
      .api
      .request(Method::DELETE, &format!("/content/{page_id}"), None)
      .await?;
    info!(page_id, "Deleted page");
    Ok(())
  }

  /// Fetch a page and write it back with the parts of `revision` that are
  /// set, keeping the current title and body otherwise
  #[instrument(skip(self, revision), level = "debug")]
  pub async fn revise_page(&self, page_id: &str, revision: &PageRevision) -> Result<Page> {
    let current = self.get_page(page_id, REVISE_EXPAND).await?;

    let current_version = current.version_number().unwrap_or_else(|| {
      warn!(page_id, "Page has no version information, assuming version 1");
      1
    });

    let update = PageUpdate {
      title: revision.title.clone().unwrap_or_else(|| current.title.clone()),
      body: match &revision.body {
        Some(body) => body.clone(),
        None => current
          .body
          .as_ref()
          .and_then(|b| b.storage.as_ref())
          .map(|s| s.value.clone())
          .unwrap_or_default(),
      },
      message: revision.message.clone(),
    };

    self.update_page(page_id, &update, current_version).await
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Result;
  use atl_test_utils::{RecordingTransport, fixtures};
  use serde_json::json;
  use wiremock::matchers::{body_json, header, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::consts::PAGE_EXPAND;

  fn stub_client() -> (ConfluenceClient<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::new();
    (ConfluenceClient::with_transport(transport.clone()), transport)
  }

  #[tokio::test]
  async fn test_get_page() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = ConfluenceClient::new(&mock_server.uri(), "test_token")?;

    Mock::given(method("GET"))
      .and(path("/rest/api/content/123456"))
      .and(query_param("expand", "version,space,body.storage"))
      .and(header("Authorization", "Bearer test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::confluence_page(4)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let page = client
      .get_page("123456", &["version", "space", "body.storage"])
      .await?;
    assert_eq!(page.title, "Release Notes");
    assert_eq!(page.version_number(), Some(4));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_page_without_expand() -> Result<()> {
    let (client, transport) = stub_client();
    transport.push_json(fixtures::confluence_page(1));

    client.get_page("123456", &[]).await?;
    assert_eq!(transport.requests()[0].path, "/content/123456");

    client.get_page("123456", PAGE_EXPAND).await.ok();
    assert_eq!(transport.requests()[1].path, "/content/123456?expand=version%2Cspace");

    Ok(())
  }

  #[tokio::test]
  async fn test_create_page() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = ConfluenceClient::new(&mock_server.uri(), "test_token")?;

    Mock::given(method("POST"))
      .and(path("/rest/api/content"))
      .and(body_json(json!({
          "type": "page",
          "title": "Release Notes",
          "space": { "key": "ENG" },
          "body": { "storage": { "value": "<p>Hello</p>", "representation": "storage" } }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::confluence_page(1)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let page = client
      .create_page(&NewPage {
        space_key: "ENG".to_string(),
        title: "Release Notes".to_string(),
        body: "<p>Hello</p>".to_string(),
        parent_id: None,
      })
      .await?;
    assert_eq!(page.id, "123456");

    Ok(())
  }

  #[tokio::test]
  async fn test_update_page_submits_next_version() -> Result<()> {
    let (client, transport) = stub_client();
    transport.push_json(fixtures::confluence_page(5));

    let update = PageUpdate {
      title: "Release Notes".to_string(),
      body: "<p>Hello again</p>".to_string(),
      message: Some("Typo".to_string()),
    };
    let page = client.update_page("123456", &update, 4).await?;
    assert_eq!(page.version_number(), Some(5));

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/content/123456");
    assert_eq!(
      request.body.as_ref().map(|b| b["version"].clone()),
      Some(json!({ "number": 5, "message": "Typo" }))
    );

    Ok(())
  }

  /// A second update built from the first update's response moves on again
  #[tokio::test]
  async fn test_consecutive_updates_chain_versions() -> Result<()> {
    let (client, transport) = stub_client();
    transport
      .push_json(fixtures::confluence_page(5))
      .push_json(fixtures::confluence_page(6));

    let update = PageUpdate {
      title: "Release Notes".to_string(),
      body: "<p>v5</p>".to_string(),
      message: None,
    };
    let first = client.update_page("123456", &update, 4).await?;
    let second = client
      .update_page("123456", &update, first.version_number().unwrap_or_default())
      .await?;
    assert_eq!(second.version_number(), Some(6));

    let numbers: Vec<_> = transport
      .requests()
      .iter()
      .map(|r| r.body.as_ref().map(|b| b["version"]["number"].clone()))
      .collect();
    assert_eq!(numbers, vec![Some(json!(5)), Some(json!(6))]);

    Ok(())
  }

  #[tokio::test]
  async fn test_update_page_conflict() {
    let (client, transport) = stub_client();
    transport.push_status(409, "Version must be incremented on update");

    let update = PageUpdate {
      title: "t".to_string(),
      body: "b".to_string(),
      message: None,
    };
    let err = client.update_page("123456", &update, 4).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(err.to_string().contains("Version must be incremented"));
  }

  #[tokio::test]
  async fn test_delete_page() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = ConfluenceClient::new(&mock_server.uri(), "test_token")?;

    Mock::given(method("DELETE"))
      .and(path("/rest/api/content/123456"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.delete_page("123456").await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_revise_page_keeps_body_when_only_title_changes() -> Result<()> {
    let (client, transport) = stub_client();
    transport
      .push_json(fixtures::confluence_page(4))
      .push_json(fixtures::confluence_page(5));

    let revision = PageRevision {
      title: Some("Release Notes 2.0".to_string()),
      ..PageRevision::default()
    };
    client.revise_page("123456", &revision).await?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/content/123456?expand=body.storage%2Cversion");
    assert_eq!(
      requests[1].body,
      Some(json!({
          "type": "page",
          "title": "Release Notes 2.0",
          "body": { "storage": { "value": "<p>Hello</p>", "representation": "storage" } },
          "version": { "number": 5 }
      }))
    );

    Ok(())
  }

  #[tokio::test]
  async fn test_revise_page_replaces_body_and_keeps_title() -> Result<()> {
    let (client, transport) = stub_client();
    transport
      .push_json(fixtures::confluence_page(9))
      .push_json(fixtures::confluence_page(10));

    let revision = PageRevision {
      body: Some("<p>Rewritten</p>".to_string()),
      message: Some("Rewrite".to_string()),
      ..PageRevision::default()
    };
    let page = client.revise_page("123456", &revision).await?;
    assert_eq!(page.version_number(), Some(10));

    let body = transport.requests()[1].body.clone().unwrap();
    assert_eq!(body["title"], "Release Notes");
    assert_eq!(body["body"]["storage"]["value"], "<p>Rewritten</p>");
    assert_eq!(body["version"], json!({ "number": 10, "message": "Rewrite" }));

    Ok(())
  }

  #[tokio::test]
  async fn test_revise_page_fetch_failure_sends_no_update() {
    let (client, transport) = stub_client();
    transport.push_status(404, "No content found with id: 999");

    let revision = PageRevision {
      title: Some("x".to_string()),
      ..PageRevision::default()
    };
    let err = client.revise_page("999", &revision).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(transport.call_count(), 1);
  }
}
