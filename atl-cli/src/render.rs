//! # Text Rendering
//!
//! Builds the text-mode output of every command. Each function returns the
//! rendered string so the handlers only decide where it goes.

use atl_confluence::{BodyFormat, Page, Space};
use atl_core::text::{PLACEHOLDER, date_only, or_default, or_placeholder, truncate, yes_no};
use atl_jira::{Board, Comments, DeploymentMode, Field, Issue, Sprint, Transition, UserSearchResult};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::consts::{FIELD_VALUE_WIDTH, PAGE_TITLE_WIDTH, SEARCH_TITLE_WIDTH, SPACE_NAME_WIDTH, SUMMARY_WIDTH};

const UNASSIGNED: &str = "Unassigned";

#[derive(Tabled)]
struct FieldRow {
  #[tabled(rename = "Field")]
  field: &'static str,
  #[tabled(rename = "Value")]
  value: String,
}

impl FieldRow {
  fn new(field: &'static str, value: impl Into<String>) -> Self {
    Self {
      field,
      value: value.into(),
    }
  }
}

#[derive(Tabled)]
struct IssueRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "SP")]
  story_points: String,
  #[tabled(rename = "Assignee")]
  assignee: String,
  #[tabled(rename = "Summary")]
  summary: String,
}

#[derive(Tabled)]
struct TransitionRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "To Status")]
  to: String,
}

#[derive(Tabled)]
struct BoardRow {
  #[tabled(rename = "Board ID")]
  id: u64,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "Type")]
  board_type: String,
  #[tabled(rename = "Project")]
  project: String,
}

#[derive(Tabled)]
struct SprintRow {
  #[tabled(rename = "Sprint ID")]
  id: u64,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "State")]
  state: String,
  #[tabled(rename = "Start Date")]
  start: String,
  #[tabled(rename = "End Date")]
  end: String,
}

#[derive(Tabled)]
struct JiraFieldRow {
  #[tabled(rename = "Field ID")]
  id: String,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "Custom")]
  custom: &'static str,
  #[tabled(rename = "Type")]
  field_type: String,
}

#[derive(Tabled)]
struct UserRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Display Name")]
  display_name: String,
  #[tabled(rename = "Email")]
  email: String,
  #[tabled(rename = "Active")]
  active: &'static str,
}

#[derive(Tabled)]
struct PageRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Title")]
  title: String,
}

#[derive(Tabled)]
struct SearchRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Space")]
  space: String,
  #[tabled(rename = "Title")]
  title: String,
}

#[derive(Tabled)]
struct SpaceRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "Type")]
  space_type: String,
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
  Table::new(rows).with(Style::sharp()).to_string()
}

/// Story points without a trailing `.0` for whole numbers
pub fn format_points(points: Option<f64>) -> String {
  match points {
    Some(p) if p.fract() == 0.0 => format!("{p:.0}"),
    Some(p) => p.to_string(),
    None => PLACEHOLDER.to_string(),
  }
}

/// Key/value view of a single issue, followed by its description
pub fn issue_details(issue: &Issue, url: &str) -> String {
  let fields = &issue.fields;
  let mut rows = vec![
    FieldRow::new("Summary", truncate(&fields.summary, FIELD_VALUE_WIDTH)),
    FieldRow::new("Status", or_placeholder(fields.status_name())),
    FieldRow::new("Priority", or_placeholder(fields.priority_name())),
    FieldRow::new("Assignee", or_default(fields.assignee_name(), UNASSIGNED)),
    FieldRow::new(
      "Reporter",
      or_placeholder(fields.reporter.as_ref().map(|r| r.display_name.as_str())),
    ),
    FieldRow::new(
      "Type",
      or_placeholder(fields.issue_type.as_ref().map(|t| t.name.as_str())),
    ),
  ];
  if fields.story_points.is_some() {
    rows.push(FieldRow::new("Story Points", format_points(fields.story_points)));
  }
  rows.push(FieldRow::new("URL", url));

  let mut out = format!("{}\n{}", issue.key, table(rows));
  if let Some(description) = fields.description.as_deref().filter(|d| !d.trim().is_empty()) {
    out.push_str("\n\nDescription\n\n");
    out.push_str(description);
  }
  out
}

/// One row per issue with a truncated summary
pub fn issue_table(issues: &[Issue]) -> String {
  let rows = issues
    .iter()
    .map(|issue| IssueRow {
      key: issue.key.clone(),
      status: or_placeholder(issue.fields.status_name()),
      story_points: format_points(issue.fields.story_points),
      assignee: or_default(issue.fields.assignee_name(), UNASSIGNED),
      summary: truncate(&issue.fields.summary, SUMMARY_WIDTH),
    })
    .collect();
  table(rows)
}

pub fn comment_list(issue_key: &str, comments: &Comments) -> String {
  let mut out = format!("Comments on {issue_key} ({} total):\n", comments.total);
  for comment in &comments.comments {
    let author = or_placeholder(comment.author.as_ref().map(|a| a.display_name.as_str()));
    out.push_str(&format!(
      "\n---\n{author} ({})\n{}\n",
      date_only(comment.created.as_deref()),
      comment.body
    ));
  }
  out
}

pub fn transition_table(transitions: &[Transition]) -> String {
  let rows = transitions
    .iter()
    .map(|t| TransitionRow {
      id: t.id.clone(),
      name: t.name.clone(),
      to: or_placeholder(t.to.as_ref().map(|s| s.name.as_str())),
    })
    .collect();
  table(rows)
}

pub fn board_table(boards: &[Board]) -> String {
  let rows = boards
    .iter()
    .map(|b| BoardRow {
      id: b.id,
      name: b.name.clone(),
      board_type: b.board_type.clone(),
      project: or_placeholder(b.project_key()),
    })
    .collect();
  table(rows)
}

pub fn sprint_table(sprints: &[Sprint]) -> String {
  let rows = sprints
    .iter()
    .map(|s| SprintRow {
      id: s.id,
      name: s.name.clone(),
      state: s.state.clone(),
      start: date_only(s.start_date.as_deref()),
      end: date_only(s.end_date.as_deref()),
    })
    .collect();
  table(rows)
}

pub fn field_table(fields: &[Field]) -> String {
  let rows = fields
    .iter()
    .map(|f| JiraFieldRow {
      id: f.id.clone(),
      name: f.name.clone(),
      custom: yes_no(f.custom),
      field_type: or_placeholder(f.schema_type()),
    })
    .collect();
  table(rows)
}

/// Users with the identifier assignment expects in `mode`
pub fn user_table(users: &[UserSearchResult], mode: DeploymentMode) -> String {
  let rows = users
    .iter()
    .map(|u| UserRow {
      id: or_placeholder(u.identifier(mode)),
      display_name: u.display_name.clone(),
      email: or_placeholder(u.email_address.as_deref()),
      active: yes_no(u.active),
    })
    .collect();
  table(rows)
}

/// Key/value view of a page, followed by its body when one was requested
pub fn page_details(page: &Page, body_format: Option<BodyFormat>, web_url: &str) -> String {
  let mut rows = vec![
    FieldRow::new("ID", page.id.clone()),
    FieldRow::new("Title", truncate(&page.title, PAGE_TITLE_WIDTH)),
    FieldRow::new("Type", page.content_type.clone()),
    FieldRow::new("Status", page.status.clone()),
  ];
  if let Some(space) = &page.space {
    rows.push(FieldRow::new("Space", format!("{} - {}", space.key, space.name)));
  }
  if let Some(version) = &page.version {
    rows.push(FieldRow::new("Version", version.number.to_string()));
    if let Some(by) = &version.by {
      rows.push(FieldRow::new("Author", by.display_name.clone()));
    }
    rows.push(FieldRow::new("Updated", or_placeholder(version.when.as_deref())));
  }
  rows.push(FieldRow::new("Web URL", web_url));

  let mut out = table(rows);
  if let Some(content) = body_format
    .and_then(|format| page.body_in(format))
    .filter(|c| !c.is_empty())
  {
    out.push_str("\n\n--- Body Content ---\n");
    out.push_str(content);
  }
  out
}

pub fn page_table(pages: &[Page]) -> String {
  let rows = pages
    .iter()
    .map(|p| PageRow {
      id: p.id.clone(),
      title: truncate(&p.title, PAGE_TITLE_WIDTH),
    })
    .collect();
  table(rows)
}

pub fn search_table(pages: &[Page]) -> String {
  let rows = pages
    .iter()
    .map(|p| SearchRow {
      id: p.id.clone(),
      space: or_placeholder(p.space.as_ref().map(|s| s.key.as_str())),
      title: truncate(&p.title, SEARCH_TITLE_WIDTH),
    })
    .collect();
  table(rows)
}

pub fn space_details(space: &Space) -> String {
  table(vec![
    FieldRow::new("ID", space.id.to_string()),
    FieldRow::new("Key", space.key.clone()),
    FieldRow::new("Name", space.name.clone()),
    FieldRow::new("Status", or_placeholder(space.status.as_deref())),
    FieldRow::new("Type", space.space_type.clone()),
  ])
}

pub fn space_table(spaces: &[Space]) -> String {
  let rows = spaces
    .iter()
    .map(|s| SpaceRow {
      key: s.key.clone(),
      name: truncate(&s.name, SPACE_NAME_WIDTH),
      space_type: s.space_type.clone(),
    })
    .collect();
  table(rows)
}
