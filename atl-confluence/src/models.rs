use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{PAGE_TYPE, STORAGE_REPRESENTATION};

/// Represents a Confluence page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
  pub id: String,
  #[serde(rename = "type", default)]
  pub content_type: String,
  #[serde(default)]
  pub status: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub space: Option<Space>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<Version>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<PageBody>,
  #[serde(rename = "_links", default)]
  pub links: Links,
}

impl Page {
  pub fn version_number(&self) -> Option<u64> {
    self.version.as_ref().map(|v| v.number)
  }

  /// Body content in the given representation, if it was expanded
  pub fn body_in(&self, format: BodyFormat) -> Option<&str> {
    let body = self.body.as_ref()?;
    let content = match format {
      BodyFormat::Storage => body.storage.as_ref(),
      BodyFormat::View => body.view.as_ref(),
    };
    content.map(|c| c.value.as_str())
  }
}

/// Version metadata of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
  pub number: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub by: Option<ConfluenceUser>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub when: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(default)]
  pub minor_edit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceUser {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub user_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(default)]
  pub display_name: String,
}

/// Represents a Confluence space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
  #[serde(default)]
  pub id: u64,
  pub key: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(rename = "type", default)]
  pub space_type: String,
  #[serde(rename = "_links", default)]
  pub links: Links,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBody {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub storage: Option<BodyContent>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub view: Option<BodyContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyContent {
  pub value: String,
  pub representation: String,
}

impl BodyContent {
  /// Storage-format content, the only representation the client writes
  pub fn storage(value: &str) -> Self {
    Self {
      value: value.to_string(),
      representation: STORAGE_REPRESENTATION.to_string(),
    }
  }
}

/// Hypermedia links attached to pages, spaces and result sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub webui: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub edit: Option<String>,
  #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
  pub self_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next: Option<String>,
}

/// One page of results from a listing or search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results<T> {
  #[serde(default = "Vec::new")]
  pub results: Vec<T>,
  #[serde(default)]
  pub start: u64,
  #[serde(default)]
  pub limit: u64,
  #[serde(default)]
  pub size: u64,
  #[serde(rename = "_links", default)]
  pub links: Links,
}

/// Body representation to request when reading a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
  Storage,
  View,
}

impl BodyFormat {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Storage => "storage",
      Self::View => "view",
    }
  }

  /// Expansion that includes this representation in a page response
  pub fn expand(self) -> String {
    format!("body.{}", self.as_str())
  }
}

impl fmt::Display for BodyFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BodyFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "storage" => Ok(Self::Storage),
      "view" => Ok(Self::View),
      other => Err(format!("unknown body format '{other}', expected storage or view")),
    }
  }
}

/// Parameters for creating a page
#[derive(Debug, Clone, PartialEq)]
pub struct NewPage {
  pub space_key: String,
  pub title: String,
  /// Storage-format body
  pub body: String,
  pub parent_id: Option<String>,
}

/// Full replacement of a page's title and body
#[derive(Debug, Clone, PartialEq)]
pub struct PageUpdate {
  pub title: String,
  /// Storage-format body
  pub body: String,
  pub message: Option<String>,
}

/// Partial change to a page; unset parts keep the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRevision {
  pub title: Option<String>,
  pub body: Option<String>,
  pub message: Option<String>,
}

impl PageRevision {
  /// Whether the revision changes title or body
  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.body.is_none()
  }
}

/// Request payload for page creation
#[derive(Debug, Serialize)]
pub(crate) struct CreatePageRequest<'a> {
  #[serde(rename = "type")]
  pub content_type: &'static str,
  pub title: &'a str,
  pub space: SpaceRef<'a>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ancestors: Vec<AncestorRef<'a>>,
  pub body: StorageBody,
}

impl<'a> CreatePageRequest<'a> {
  pub fn new(page: &'a NewPage) -> Self {
    Self {
      content_type: PAGE_TYPE,
      title: &page.title,
      space: SpaceRef { key: &page.space_key },
      ancestors: page.parent_id.as_deref().map(|id| AncestorRef { id }).into_iter().collect(),
      body: StorageBody {
        storage: BodyContent::storage(&page.body),
      },
    }
  }
}

#[derive(Debug, Serialize)]
pub(crate) struct SpaceRef<'a> {
  pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AncestorRef<'a> {
  pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StorageBody {
  pub storage: BodyContent,
}

/// Request payload for a page update
#[derive(Debug, Serialize)]
pub(crate) struct UpdatePageRequest<'a> {
  #[serde(rename = "type")]
  pub content_type: &'static str,
  pub title: &'a str,
  pub body: StorageBody,
  pub version: NextVersion<'a>,
}

impl<'a> UpdatePageRequest<'a> {
  /// The API rejects an update unless it carries the version after the
  /// current one
  pub fn new(update: &'a PageUpdate, current_version: u64) -> Self {
    Self {
      content_type: PAGE_TYPE,
      title: &update.title,
      body: StorageBody {
        storage: BodyContent::storage(&update.body),
      },
      version: NextVersion {
        number: current_version + 1,
        message: update.message.as_deref().filter(|m| !m.is_empty()),
      },
    }
  }
}

#[derive(Debug, Serialize)]
pub(crate) struct NextVersion<'a> {
  pub number: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<&'a str>,
}

#[cfg(test)]
mod tests {
  use atl_test_utils::fixtures;
  use serde_json::json;
  use test_case::test_case;

  use super::*;

  #[test]
  fn test_page_from_fixture() {
    let page: Page = serde_json::from_value(fixtures::confluence_page(4)).unwrap();

    assert_eq!(page.id, "123456");
    assert_eq!(page.content_type, "page");
    assert_eq!(page.version_number(), Some(4));
    assert_eq!(page.space.as_ref().map(|s| s.key.as_str()), Some("ENG"));
    assert_eq!(page.body_in(BodyFormat::Storage), Some("<p>Hello</p>"));
    assert_eq!(page.body_in(BodyFormat::View), None);
    assert_eq!(page.links.webui.as_deref(), Some("/display/ENG/Release+Notes"));
    assert_eq!(
      page.version.as_ref().and_then(|v| v.by.as_ref()).map(|u| u.display_name.as_str()),
      Some("Ada Lovelace")
    );
  }

  #[test]
  fn test_page_minimal() {
    let page: Page = serde_json::from_value(json!({ "id": "1", "title": "Bare" })).unwrap();
    assert_eq!(page.version_number(), None);
    assert_eq!(page.links, Links::default());

    let rendered = serde_json::to_value(&page).unwrap();
    assert!(rendered.get("body").is_none());
    assert_eq!(rendered["_links"], json!({}));
  }

  #[test]
  fn test_create_request_with_parent() {
    let page = NewPage {
      space_key: "ENG".to_string(),
      title: "Runbook".to_string(),
      body: "<p>Steps</p>".to_string(),
      parent_id: Some("42".to_string()),
    };

    assert_eq!(
      serde_json::to_value(CreatePageRequest::new(&page)).unwrap(),
      json!({
          "type": "page",
          "title": "Runbook",
          "space": { "key": "ENG" },
          "ancestors": [{ "id": "42" }],
          "body": { "storage": { "value": "<p>Steps</p>", "representation": "storage" } }
      })
    );
  }

  #[test]
  fn test_create_request_without_parent_omits_ancestors() {
    let page = NewPage {
      space_key: "ENG".to_string(),
      title: "Runbook".to_string(),
      body: "<p>Steps</p>".to_string(),
      parent_id: None,
    };

    let body = serde_json::to_value(CreatePageRequest::new(&page)).unwrap();
    assert!(body.get("ancestors").is_none());
  }

  #[test_case(1, 2 ; "first edit")]
  #[test_case(4, 5 ; "later edit")]
  fn test_update_request_bumps_version(current: u64, expected: u64) {
    let update = PageUpdate {
      title: "Release Notes".to_string(),
      body: "<p>Hi</p>".to_string(),
      message: None,
    };

    let body = serde_json::to_value(UpdatePageRequest::new(&update, current)).unwrap();
    assert_eq!(body["version"], json!({ "number": expected }));
    assert_eq!(body["type"], "page");
  }

  #[test]
  fn test_update_request_carries_message() {
    let update = PageUpdate {
      title: "Release Notes".to_string(),
      body: "<p>Hi</p>".to_string(),
      message: Some("Updated via CLI".to_string()),
    };

    let body = serde_json::to_value(UpdatePageRequest::new(&update, 4)).unwrap();
    assert_eq!(body["version"], json!({ "number": 5, "message": "Updated via CLI" }));
  }

  #[test_case("storage", Some(BodyFormat::Storage))]
  #[test_case("VIEW", Some(BodyFormat::View))]
  #[test_case("wiki", None)]
  fn test_body_format_parse(input: &str, expected: Option<BodyFormat>) {
    assert_eq!(input.parse::<BodyFormat>().ok(), expected);
  }

  #[test]
  fn test_body_format_expand() {
    assert_eq!(BodyFormat::Storage.expand(), "body.storage");
    assert_eq!(BodyFormat::View.to_string(), "view");
  }
}
