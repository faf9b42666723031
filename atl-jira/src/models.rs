use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which flavour of Jira the client talks to.
///
/// Cloud identifies users by `accountId`; Server and Data Center still use
/// the legacy `name`. A client keeps one mode for its whole lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
  #[default]
  Cloud,
  Server,
}

impl DeploymentMode {
  /// Parse a mode from a config or environment value
  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "cloud" => Some(Self::Cloud),
      "server" | "datacenter" | "data-center" | "dc" => Some(Self::Server),
      _ => None,
    }
  }

  /// JSON key carrying a user identifier in request bodies
  pub fn user_key(self) -> &'static str {
    match self {
      Self::Cloud => "accountId",
      Self::Server => "name",
    }
  }

  /// Query parameter used by the user search endpoint
  pub fn user_search_param(self) -> &'static str {
    match self {
      Self::Cloud => "query",
      Self::Server => "username",
    }
  }
}

impl fmt::Display for DeploymentMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Cloud => write!(f, "cloud"),
      Self::Server => write!(f, "server"),
    }
  }
}

/// Represents a Jira issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
  pub key: String,
  pub fields: IssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
  #[serde(default)]
  pub summary: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<Status>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority: Option<Priority>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assignee: Option<User>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reporter: Option<User>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<Project>,
  #[serde(rename = "issuetype", default, skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<IssueType>,
  #[serde(rename = "customfield_10106", default, skip_serializing_if = "Option::is_none")]
  pub story_points: Option<f64>,
}

impl IssueFields {
  pub fn status_name(&self) -> Option<&str> {
    self.status.as_ref().map(|s| s.name.as_str())
  }

  pub fn priority_name(&self) -> Option<&str> {
    self.priority.as_ref().map(|p| p.name.as_str())
  }

  pub fn assignee_name(&self) -> Option<&str> {
    self.assignee.as_ref().map(|a| a.display_name.as_str())
  }
}

/// Represents a Jira issue status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priority {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub display_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email_address: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub account_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub key: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueType {
  pub name: String,
}

/// Result of a JQL search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub issues: Vec<Issue>,
}

/// Parameters for creating an issue
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
  pub project: String,
  pub issue_type: String,
  pub summary: String,
  pub description: Option<String>,
}

/// Request payload for issue creation
#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueRequest<'a> {
  pub fields: CreateIssueFields<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueFields<'a> {
  pub project: KeyRef<'a>,
  pub summary: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<&'a str>,
  #[serde(rename = "issuetype")]
  pub issue_type: NameRef<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeyRef<'a> {
  pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NameRef<'a> {
  pub name: &'a str,
}

/// Response returned after creating an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
  pub self_url: Option<String>,
}

/// A field that `update` knows how to set
#[derive(Debug, Clone, PartialEq)]
pub enum IssueField {
  Summary(String),
  Description(String),
  /// Story points live in a deployment-specific custom field
  StoryPoints { field_id: String, points: f64 },
}

impl IssueField {
  /// Field id the value is written to
  pub fn key(&self) -> &str {
    match self {
      Self::Summary(_) => "summary",
      Self::Description(_) => "description",
      Self::StoryPoints { field_id, .. } => field_id,
    }
  }

  fn value(&self) -> Value {
    match self {
      Self::Summary(s) | Self::Description(s) => Value::String(s.clone()),
      Self::StoryPoints { points, .. } => Value::from(*points),
    }
  }
}

/// Builder for a partial issue update.
///
/// Only fields that were explicitly set end up in the request body; setting
/// the same field twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
  fields: Vec<IssueField>,
}

impl FieldUpdate {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn summary(self, summary: impl Into<String>) -> Self {
    self.set(IssueField::Summary(summary.into()))
  }

  pub fn description(self, description: impl Into<String>) -> Self {
    self.set(IssueField::Description(description.into()))
  }

  pub fn story_points(self, field_id: impl Into<String>, points: f64) -> Self {
    self.set(IssueField::StoryPoints {
      field_id: field_id.into(),
      points,
    })
  }

  /// Set a field, replacing any earlier value for the same key
  pub fn set(mut self, field: IssueField) -> Self {
    self.fields.retain(|f| f.key() != field.key());
    self.fields.push(field);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn fields(&self) -> &[IssueField] {
    &self.fields
  }

  /// Request body for `PUT /issue/{key}`
  pub fn to_body(&self) -> Value {
    let fields: Map<String, Value> = self.fields.iter().map(|f| (f.key().to_string(), f.value())).collect();
    serde_json::json!({ "fields": fields })
  }
}

/// Target of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
  /// A resolved account id (cloud) or username (server)
  User(String),
  /// Clear the assignee
  Nobody,
}

impl Assignee {
  /// Request body for `PUT /issue/{key}/assignee`.
  ///
  /// Unassigning sends an explicit `null`; omitting the key would leave the
  /// assignee unchanged.
  pub fn to_body(&self, mode: DeploymentMode) -> Value {
    let value = match self {
      Self::User(id) => Value::String(id.clone()),
      Self::Nobody => Value::Null,
    };
    let mut body = Map::new();
    body.insert(mode.user_key().to_string(), value);
    Value::Object(body)
  }
}

/// Represents a Jira comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id: String,
  #[serde(default)]
  pub body: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<User>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comments {
  #[serde(default)]
  pub comments: Vec<Comment>,
  #[serde(default)]
  pub total: u64,
}

/// Request payload for adding a comment
#[derive(Debug, Serialize)]
pub(crate) struct AddCommentRequest<'a> {
  pub body: &'a str,
}

/// Represents a Jira transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to: Option<Status>,
}

impl Transition {
  /// `Name (id)` label used when listing alternatives
  pub fn label(&self) -> String {
    format!("{} ({})", self.name, self.id)
  }
}

/// Represents a list of Jira transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transitions {
  pub transitions: Vec<Transition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}

/// One entry returned by the user search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResult {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub account_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(default)]
  pub display_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email_address: Option<String>,
  #[serde(default)]
  pub active: bool,
}

impl UserSearchResult {
  /// The identifier assignment requests need in the given mode
  pub fn identifier(&self, mode: DeploymentMode) -> Option<&str> {
    match mode {
      DeploymentMode::Cloud => self.account_id.as_deref(),
      DeploymentMode::Server => self.name.as_deref().or(self.key.as_deref()),
    }
  }
}

/// A user identifier resolved from free-form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
  pub identifier: String,
  /// Display name when the identifier came from a lookup
  pub display_name: Option<String>,
  /// How many users the lookup matched
  pub matches: usize,
}

/// Represents a Jira field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  pub name: String,
  #[serde(default)]
  pub custom: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<FieldSchema>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl Field {
  pub fn schema_type(&self) -> Option<&str> {
    self.schema.as_ref().and_then(|s| s.field_type.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub field_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_id: Option<u64>,
}

/// One page of an Agile API listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
  #[serde(default)]
  pub max_results: u64,
  #[serde(default)]
  pub start_at: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total: Option<u64>,
  #[serde(default)]
  pub is_last: bool,
  #[serde(default = "Vec::new")]
  pub values: Vec<T>,
}

/// Represents an Agile board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
  pub id: u64,
  pub name: String,
  #[serde(rename = "type", default)]
  pub board_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<BoardLocation>,
}

impl Board {
  pub fn project_key(&self) -> Option<&str> {
    self.location.as_ref().and_then(|l| l.project_key.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardLocation {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_id: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_key: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_name: Option<String>,
}

/// Represents a sprint on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub state: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub complete_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub origin_board_id: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub goal: Option<String>,
}

#[cfg(test)]
mod tests {
  use atl_test_utils::fixtures;
  use serde_json::json;

  use super::*;

  #[test]
  fn test_issue_round_trips_fixture() {
    let fixture = fixtures::jira_issue();
    let issue: Issue = serde_json::from_value(fixture.clone()).unwrap();

    assert_eq!(issue.key, "TEST-123");
    assert_eq!(issue.fields.status_name(), Some("In Progress"));
    assert_eq!(issue.fields.assignee_name(), Some("Ada Lovelace"));
    assert_eq!(issue.fields.story_points, Some(5.0));
    assert_eq!(issue.fields.issue_type.as_ref().map(|t| t.name.as_str()), Some("Bug"));

    // Every field the client models survives re-encoding unchanged
    let rendered = serde_json::to_value(&issue).unwrap();
    assert_eq!(rendered["key"], fixture["key"]);
    for field in [
      "summary",
      "description",
      "status",
      "priority",
      "assignee",
      "reporter",
      "project",
      "issuetype",
      "customfield_10106",
    ] {
      assert_eq!(rendered["fields"][field], fixture["fields"][field], "field {field} changed");
    }
  }

  #[test]
  fn test_issue_with_missing_optionals() {
    let issue: Issue = serde_json::from_value(json!({
        "key": "TEST-2",
        "fields": { "summary": "Bare", "assignee": null }
    }))
    .unwrap();

    assert_eq!(issue.fields.assignee, None);
    assert_eq!(issue.fields.status_name(), None);
    assert_eq!(issue.fields.story_points, None);

    let rendered = serde_json::to_value(&issue).unwrap();
    assert!(rendered["fields"].get("assignee").is_none());
  }

  #[test]
  fn test_field_update_only_contains_set_fields() {
    let update = FieldUpdate::new().summary("New title");
    assert_eq!(update.to_body(), json!({ "fields": { "summary": "New title" } }));

    let update = update.story_points("customfield_10106", 8.0).summary("Newer title");
    assert_eq!(update.len(), 2);
    assert_eq!(
      update.to_body(),
      json!({ "fields": { "customfield_10106": 8.0, "summary": "Newer title" } })
    );
  }

  #[test]
  fn test_field_update_empty() {
    assert!(FieldUpdate::new().is_empty());
    assert_eq!(FieldUpdate::new().to_body(), json!({ "fields": {} }));
  }

  #[test]
  fn test_assignee_body_per_mode() {
    let user = Assignee::User("abc123".to_string());
    assert_eq!(user.to_body(DeploymentMode::Cloud), json!({ "accountId": "abc123" }));
    assert_eq!(user.to_body(DeploymentMode::Server), json!({ "name": "abc123" }));
  }

  #[test]
  fn test_unassign_sends_explicit_null() {
    let body = Assignee::Nobody.to_body(DeploymentMode::Cloud);
    assert_eq!(body, json!({ "accountId": null }));
    assert!(body.as_object().unwrap().contains_key("accountId"));

    assert_eq!(Assignee::Nobody.to_body(DeploymentMode::Server), json!({ "name": null }));
  }

  #[test]
  fn test_deployment_mode_parse() {
    assert_eq!(DeploymentMode::parse("cloud"), Some(DeploymentMode::Cloud));
    assert_eq!(DeploymentMode::parse("Server"), Some(DeploymentMode::Server));
    assert_eq!(DeploymentMode::parse("data-center"), Some(DeploymentMode::Server));
    assert_eq!(DeploymentMode::parse("on-prem"), None);
  }

  #[test]
  fn test_user_identifier_per_mode() {
    let users: Vec<UserSearchResult> = serde_json::from_value(fixtures::jira_users()).unwrap();

    assert_eq!(
      users[0].identifier(DeploymentMode::Cloud),
      Some("5b10a2844c20165700ede21g")
    );
    assert_eq!(users[0].identifier(DeploymentMode::Server), Some("ada"));
    assert!(!users[1].active);
  }

  #[test]
  fn test_transition_label() {
    let transitions: Transitions = serde_json::from_value(fixtures::jira_transitions()).unwrap();
    assert_eq!(transitions.transitions[0].label(), "In Progress (11)");
    assert_eq!(
      transitions.transitions[1].to.as_ref().map(|s| s.name.as_str()),
      Some("Done")
    );
  }

  #[test]
  fn test_transition_request_serialization() {
    let request = TransitionRequest {
      transition: TransitionId { id: "21".to_string() },
    };

    assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "transition": { "id": "21" } }));
  }
}
