//! # Issue Update
//!
//! `atl jira update` fans out over up to three endpoints: assignment, sprint
//! membership and field edits. The requested changes are collected into an
//! [`UpdatePlan`] first, which is where validation happens, so a command
//! with nothing to do never reaches the network.
//!
//! The calls run in a fixed order (assign, sprint, fields) and are not
//! transactional. When one fails, the error names the steps that already
//! went through.

use std::fmt;

use anyhow::{Result, bail};
use atl_core::{ApiError, Transport};
use atl_jira::{Assignee, FieldUpdate, JiraClient};
use serde::Serialize;
use tracing::info;

/// Changes requested for one issue, validated before any client is built
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
  pub issue_key: String,
  pub fields: FieldUpdate,
  /// Email address or identifier of the new assignee
  pub assignee: Option<String>,
  pub sprint_id: Option<u64>,
}

impl UpdatePlan {
  /// Build a plan from raw flag values.
  ///
  /// Empty strings count as "not given". Fails when nothing would change or
  /// the sprint id is zero.
  pub fn new(
    issue_key: &str,
    summary: Option<String>,
    description: Option<String>,
    points: Option<(String, f64)>,
    assignee: Option<String>,
    sprint_id: Option<u64>,
  ) -> Result<Self> {
    if sprint_id == Some(0) {
      bail!("--sprint must be a positive sprint id");
    }

    let mut fields = FieldUpdate::new();
    if let Some(summary) = summary.filter(|s| !s.is_empty()) {
      fields = fields.summary(summary);
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
      fields = fields.description(description);
    }
    if let Some((field_id, points)) = points {
      fields = fields.story_points(field_id, points);
    }
    let assignee = assignee.filter(|a| !a.is_empty());

    if fields.is_empty() && assignee.is_none() && sprint_id.is_none() {
      bail!(
        "at least one change must be specified (--summary, --description, --stdin, --points, --assignee or --sprint)"
      );
    }

    Ok(Self {
      issue_key: issue_key.to_string(),
      fields,
      assignee,
      sprint_id,
    })
  }
}

/// One change that was applied to the issue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum UpdateStep {
  Assigned {
    identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
  },
  MovedToSprint {
    sprint_id: u64,
  },
  FieldsUpdated {
    fields: Vec<String>,
  },
}

impl fmt::Display for UpdateStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Assigned {
        identifier,
        display_name: Some(name),
      } => write!(f, "assigned to {name} ({identifier})"),
      Self::Assigned { identifier, .. } => write!(f, "assigned to {identifier}"),
      Self::MovedToSprint { sprint_id } => write!(f, "moved to sprint {sprint_id}"),
      Self::FieldsUpdated { fields } => write!(f, "updated {}", fields.join(", ")),
    }
  }
}

/// Outcome of a successful update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateReport {
  pub key: String,
  pub steps: Vec<UpdateStep>,
}

/// Wrap a failed call so the message lists what was already applied
fn step_failed(plan: &UpdatePlan, action: &str, done: &[UpdateStep], err: ApiError) -> anyhow::Error {
  let applied = if done.is_empty() {
    "no changes were applied".to_string()
  } else {
    let steps: Vec<String> = done.iter().map(ToString::to_string).collect();
    format!("already applied: {}", steps.join("; "))
  };
  anyhow::Error::new(err).context(format!("Failed to {action} {} ({applied})", plan.issue_key))
}

/// Apply `plan` in order: assignment, sprint move, field update
pub async fn apply_update<T: Transport>(client: &JiraClient<T>, plan: &UpdatePlan) -> Result<UpdateReport> {
  let key = plan.issue_key.as_str();
  let mut steps = Vec::new();

  if let Some(input) = &plan.assignee {
    let user = client
      .resolve_user(input)
      .await
      .map_err(|e| step_failed(plan, "resolve the assignee of", &steps, e))?;
    client
      .assign_issue(key, &Assignee::User(user.identifier.clone()))
      .await
      .map_err(|e| step_failed(plan, "assign", &steps, e))?;
    info!(issue = key, assignee = %user.identifier, "Issue assigned");
    steps.push(UpdateStep::Assigned {
      identifier: user.identifier,
      display_name: user.display_name,
    });
  }

  if let Some(sprint_id) = plan.sprint_id {
    client
      .move_to_sprint(sprint_id, &[plan.issue_key.clone()])
      .await
      .map_err(|e| step_failed(plan, "move to sprint", &steps, e))?;
    info!(issue = key, sprint_id, "Issue moved to sprint");
    steps.push(UpdateStep::MovedToSprint { sprint_id });
  }

  if !plan.fields.is_empty() {
    client
      .update_issue(key, &plan.fields)
      .await
      .map_err(|e| step_failed(plan, "update fields of", &steps, e))?;
    let fields = plan.fields.fields().iter().map(|f| f.key().to_string()).collect();
    info!(issue = key, "Issue fields updated");
    steps.push(UpdateStep::FieldsUpdated { fields });
  }

  Ok(UpdateReport {
    key: plan.issue_key.clone(),
    steps,
  })
}
