use atl_core::url::with_query;
use atl_core::{Method, Result, Transport, decode, to_body};
use tracing::{debug, instrument};

use crate::client::JiraClient;
use crate::consts::{DEFAULT_SEARCH_LIMIT, MY_ISSUES_JQL, SEARCH_FIELDS, SPRINT_ISSUES_LIMIT};
use crate::models::{
  CreateIssueFields, CreateIssueRequest, CreatedIssue, FieldUpdate, Issue, KeyRef, NameRef, NewIssue, SearchResult,
};

impl<T: Transport> JiraClient<T> {
  /// Get a Jira issue by key
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str) -> Result<Issue> {
    let data = self
      .rest
      .request(Method::GET, &format!("/issue/{issue_key}"), None)
      .await?;
    decode(&data, "issue")
  }

  /// Create an issue and return its key
  #[instrument(skip(self), level = "debug")]
  pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
    let request = CreateIssueRequest {
      fields: CreateIssueFields {
        project: KeyRef { key: &issue.project },
        summary: &issue.summary,
        description: issue.description.as_deref().filter(|d| !d.is_empty()),
        issue_type: NameRef {
          name: &issue.issue_type,
        },
      },
    };

    let body = to_body(&request)?;
    let data = self.rest.request(Method::POST, "/issue", Some(&body)).await?;
    decode(&data, "created issue")
  }

  /// Update the fields set in `update`, leaving every other field untouched
  #[instrument(skip(self), level = "debug")]
  pub async fn update_issue(&self, issue_key: &str, update: &FieldUpdate) -> Result<()> {
    let body = update.to_body();
    self
      .rest
      .request(Method::PUT, &format!("/issue/{issue_key}"), Some(&body))
      .await?;
    Ok(())
  }

  /// Run a JQL search, returning at most `max_results` issues
  #[instrument(skip(self), level = "debug")]
  pub async fn search_issues(&self, jql: &str, max_results: u32) -> Result<SearchResult> {
    let max = max_results.to_string();
    let path = with_query(
      "/search",
      &[("jql", jql), ("maxResults", max.as_str()), ("fields", SEARCH_FIELDS)],
    );

    let data = self.rest.request(Method::GET, &path, None).await?;
    let result: SearchResult = decode(&data, "search results")?;
    debug!(total = result.total, returned = result.issues.len(), "Search completed");
    Ok(result)
  }

  /// Open issues assigned to the authenticated user
  pub async fn my_issues(&self) -> Result<SearchResult> {
    self.search_issues(MY_ISSUES_JQL, DEFAULT_SEARCH_LIMIT).await
  }

  /// Issues of a project that sit in one of its open sprints
  pub async fn sprint_issues(&self, project: &str) -> Result<SearchResult> {
    let jql = format!("project = {project} AND sprint in openSprints()");
    self.search_issues(&jql, SPRINT_ISSUES_LIMIT).await
  }
}
