//! # Jira Command
//!
//! Derive-based implementation of the Jira command group: issues, comments,
//! transitions, assignment, boards, sprints, fields and user search.
//!
//! Every handler validates its arguments before the client is created, so a
//! bad invocation fails without touching the network or needing credentials.

use anyhow::{Context, Result, bail};
use atl_core::{print_info, print_success};
use atl_jira::consts::{DEFAULT_SEARCH_LIMIT, DEFAULT_STORY_POINTS_FIELD};
use atl_jira::{Assignee, NewIssue, SearchResult, filter_fields};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;

use super::{emit, emit_json};
use crate::clients;
use crate::config::Config;
use crate::consts::DEFAULT_ISSUE_TYPE;
use crate::input::read_stdin;
use crate::render;
use crate::update::{UpdatePlan, apply_update};

/// Command for Jira integration
#[derive(Args)]
pub struct JiraArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: JiraSubcommands,
}

/// Subcommands for the Jira command
#[derive(Subcommand)]
pub enum JiraSubcommands {
  /// Show an issue
  #[command(long_about = "Display the details of a Jira issue.\n\n\
                   Shows summary, status, priority, assignee, reporter, type, story points\n\
                   and the issue description.")]
  Get {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Search issues with JQL
  #[command(long_about = "Search Jira issues with a JQL query.\n\n\
                   Example: atl jira search \"project = PROJ AND status = 'In Progress'\"")]
  Search {
    /// The JQL query
    #[arg(required = true, index = 1)]
    jql: String,

    /// Maximum number of results
    #[arg(short = 'm', long = "max", default_value_t = DEFAULT_SEARCH_LIMIT)]
    max_results: u32,
  },

  /// Create an issue
  #[command(long_about = "Create a new Jira issue.\n\n\
                   The description can be given with --description or piped in with --stdin.")]
  Create {
    /// Project key
    #[arg(short = 'p', long, required = true)]
    project: String,

    /// Issue type (Story, Bug, Task, ...)
    #[arg(short = 't', long = "type", default_value = DEFAULT_ISSUE_TYPE)]
    issue_type: String,

    /// Issue summary
    #[arg(short = 's', long)]
    summary: Option<String>,

    /// Issue description
    #[arg(short = 'd', long, conflicts_with = "stdin")]
    description: Option<String>,

    /// Read the description from stdin
    #[arg(long)]
    stdin: bool,
  },

  /// Update an issue
  #[command(long_about = "Update an existing Jira issue.\n\n\
                   Changes the summary, description, story points, assignee and sprint in one\n\
                   command. At least one change is required. The assignee may be an email\n\
                   address, which is looked up, or an account id / username.")]
  Update {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// New summary
    #[arg(short = 's', long)]
    summary: Option<String>,

    /// New description
    #[arg(short = 'd', long, conflicts_with = "stdin")]
    description: Option<String>,

    /// Read the new description from stdin
    #[arg(long)]
    stdin: bool,

    /// Assign to a user (email or identifier)
    #[arg(short = 'a', long)]
    assignee: Option<String>,

    /// Story points
    #[arg(long)]
    points: Option<f64>,

    /// Custom field holding story points
    #[arg(long, default_value = DEFAULT_STORY_POINTS_FIELD)]
    points_field: String,

    /// Sprint id to move the issue into
    #[arg(long)]
    sprint: Option<u64>,
  },

  /// Assign an issue to a user, or clear its assignee
  #[command(long_about = "Assign a Jira issue.\n\n\
                   USER may be an email address, which is looked up, or an account id\n\
                   (cloud) / username (server). Use --unassign to remove the assignee.")]
  Assign {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Email address or identifier of the user
    #[arg(index = 2, conflicts_with = "unassign")]
    user: Option<String>,

    /// Remove the current assignee
    #[arg(long)]
    unassign: bool,
  },

  /// List or add comments
  #[command(subcommand)]
  Comment(CommentSubcommands),

  /// List or perform workflow transitions
  #[command(subcommand)]
  Transition(TransitionSubcommands),

  /// Open issues assigned to you
  #[command(name = "my-issues")]
  MyIssues,

  /// Issues in the open sprints of a project
  Sprint {
    /// Project key
    #[arg(short = 'p', long, required = true)]
    project: String,
  },

  /// List agile boards
  Boards {
    /// Only boards of this project
    #[arg(short = 'p', long)]
    project: Option<String>,
  },

  /// List the sprints of a board
  Sprints {
    /// Board id
    #[arg(short = 'b', long, required = true)]
    board: u64,

    /// Sprint state filter (active, future, closed)
    #[arg(short = 's', long)]
    state: Option<String>,
  },

  /// List field definitions
  #[command(long_about = "List Jira field definitions.\n\n\
                   Useful for finding custom field ids such as the story points field.")]
  Fields {
    /// Only fields whose name contains this text (case-insensitive)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Only custom fields
    #[arg(long)]
    custom: bool,
  },

  /// Search users
  Users {
    /// Name, username or email to search for
    #[arg(short = 'q', long, required = true)]
    query: String,
  },
}

/// Comment subcommands
#[derive(Subcommand)]
pub enum CommentSubcommands {
  /// List the comments of an issue
  List {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Add a comment to an issue
  Add {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Comment text
    #[arg(index = 2, required_unless_present = "stdin")]
    body: Option<String>,

    /// Read the comment from stdin
    #[arg(long, conflicts_with = "body")]
    stdin: bool,
  },
}

/// Transition subcommands
#[derive(Subcommand)]
pub enum TransitionSubcommands {
  /// List the transitions available for an issue
  List {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Move an issue through a transition
  Do {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Transition name (case-insensitive) or id
    #[arg(required = true, index = 2)]
    transition: String,
  },
}

/// Result of `assign` in JSON mode
#[derive(Serialize)]
struct AssignOutcome<'a> {
  key: &'a str,
  assignee: Option<&'a str>,
}

/// Handle the Jira command
///
/// This function processes the Jira subcommands and executes the appropriate
/// actions based on the subcommand provided.
pub(crate) fn handle_jira_command(jira: JiraArgs, config: &Config) -> Result<()> {
  match jira.subcommand {
    JiraSubcommands::Get { issue_key } => handle_get_command(config, &issue_key),
    JiraSubcommands::Search { jql, max_results } => handle_search_command(config, &jql, max_results),
    JiraSubcommands::Create {
      project,
      issue_type,
      summary,
      description,
      stdin,
    } => {
      let summary = summary.filter(|s| !s.trim().is_empty());
      let Some(summary) = summary else {
        bail!("--summary is required");
      };
      let description = if stdin { Some(read_stdin()?) } else { description };
      let issue = NewIssue {
        project,
        issue_type,
        summary,
        description,
      };
      handle_create_command(config, &issue)
    }
    JiraSubcommands::Update {
      issue_key,
      summary,
      description,
      stdin,
      assignee,
      points,
      points_field,
      sprint,
    } => {
      let description = if stdin { Some(read_stdin()?) } else { description };
      let plan = UpdatePlan::new(
        &issue_key,
        summary,
        description,
        points.map(|p| (points_field, p)),
        assignee,
        sprint,
      )?;
      handle_update_command(config, &plan)
    }
    JiraSubcommands::Assign {
      issue_key,
      user,
      unassign,
    } => {
      let user = user.filter(|u| !u.is_empty());
      if user.is_none() && !unassign {
        bail!("a user email or identifier is required (or use --unassign)");
      }
      handle_assign_command(config, &issue_key, user.as_deref())
    }
    JiraSubcommands::Comment(CommentSubcommands::List { issue_key }) => handle_comment_list_command(config, &issue_key),
    JiraSubcommands::Comment(CommentSubcommands::Add { issue_key, body, stdin }) => {
      let body = if stdin { read_stdin()? } else { body.unwrap_or_default() };
      if body.trim().is_empty() {
        bail!("comment body must not be empty");
      }
      handle_comment_add_command(config, &issue_key, &body)
    }
    JiraSubcommands::Transition(TransitionSubcommands::List { issue_key }) => {
      handle_transition_list_command(config, &issue_key)
    }
    JiraSubcommands::Transition(TransitionSubcommands::Do { issue_key, transition }) => {
      handle_transition_command(config, &issue_key, &transition)
    }
    JiraSubcommands::MyIssues => handle_my_issues_command(config),
    JiraSubcommands::Sprint { project } => handle_sprint_issues_command(config, &project),
    JiraSubcommands::Boards { project } => handle_boards_command(config, project.as_deref()),
    JiraSubcommands::Sprints { board, state } => {
      if board == 0 {
        bail!("--board must be a positive board id");
      }
      handle_sprints_command(config, board, state.as_deref())
    }
    JiraSubcommands::Fields { name, custom } => handle_fields_command(config, name.as_deref(), custom),
    JiraSubcommands::Users { query } => handle_users_command(config, &query),
  }
}

fn print_search_result(config: &Config, result: &SearchResult) -> Result<()> {
  emit(config.output, result, |r| {
    if r.issues.is_empty() {
      "No issues found.".to_string()
    } else {
      format!(
        "{}\nShowing {} of {} issues",
        render::issue_table(&r.issues),
        r.issues.len(),
        r.total
      )
    }
  })
}

fn handle_get_command(config: &Config, issue_key: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let issue = rt
    .block_on(client.get_issue(issue_key))
    .with_context(|| format!("Failed to get issue {issue_key}"))?;

  let url = client.browse_url(&issue.key);
  emit(config.output, &issue, |i| render::issue_details(i, &url))
}

fn handle_search_command(config: &Config, jql: &str, max_results: u32) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let result = rt
    .block_on(client.search_issues(jql, max_results))
    .context("Failed to search issues")?;
  print_search_result(config, &result)
}

fn handle_create_command(config: &Config, issue: &NewIssue) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let created = rt
    .block_on(client.create_issue(issue))
    .with_context(|| format!("Failed to create issue in project {}", issue.project))?;

  if config.output.is_json() {
    return emit_json(&created);
  }
  print_success(&format!("Issue {} created successfully!", created.key.bright_blue()));
  println!("URL: {}", client.browse_url(&created.key));
  Ok(())
}

fn handle_update_command(config: &Config, plan: &UpdatePlan) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let report = rt.block_on(apply_update(&client, plan))?;

  if config.output.is_json() {
    return emit_json(&report);
  }
  for step in &report.steps {
    print_info(&format!("{}: {step}", report.key));
  }
  print_success(&format!("Issue {} updated successfully!", report.key.bright_blue()));
  println!("URL: {}", client.browse_url(&report.key));
  Ok(())
}

fn handle_assign_command(config: &Config, issue_key: &str, user: Option<&str>) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let (assignee, display_name) = match user {
    Some(input) => {
      let resolved = rt
        .block_on(client.resolve_user(input))
        .with_context(|| format!("Failed to look up user {input}"))?;
      (Assignee::User(resolved.identifier), resolved.display_name)
    }
    None => (Assignee::Nobody, None),
  };
  debug!(issue = issue_key, ?assignee, "Assigning issue");

  rt.block_on(client.assign_issue(issue_key, &assignee))
    .with_context(|| format!("Failed to assign issue {issue_key}"))?;

  let identifier = match &assignee {
    Assignee::User(id) => Some(id.as_str()),
    Assignee::Nobody => None,
  };
  if config.output.is_json() {
    let outcome = AssignOutcome {
      key: issue_key,
      assignee: identifier,
    };
    return emit_json(&outcome);
  }

  match (identifier, display_name) {
    (Some(id), Some(name)) => print_success(&format!("Issue {issue_key} assigned to {name} ({id})")),
    (Some(id), None) => print_success(&format!("Issue {issue_key} assigned to {id}")),
    (None, _) => print_success(&format!("Issue {issue_key} unassigned")),
  }
  println!("URL: {}", client.browse_url(issue_key));
  Ok(())
}

fn handle_comment_list_command(config: &Config, issue_key: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let comments = rt
    .block_on(client.get_comments(issue_key))
    .with_context(|| format!("Failed to get comments for {issue_key}"))?;

  emit(config.output, &comments, |c| {
    if c.comments.is_empty() {
      format!("No comments on {issue_key}.")
    } else {
      render::comment_list(issue_key, c)
    }
  })
}

fn handle_comment_add_command(config: &Config, issue_key: &str, body: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let comment = rt
    .block_on(client.add_comment(issue_key, body))
    .with_context(|| format!("Failed to add comment to {issue_key}"))?;

  if config.output.is_json() {
    return emit_json(&comment);
  }
  print_success(&format!("Comment {} added to {issue_key}", comment.id));
  Ok(())
}

fn handle_transition_list_command(config: &Config, issue_key: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let transitions = rt
    .block_on(client.get_transitions(issue_key))
    .with_context(|| format!("Failed to get transitions for {issue_key}"))?;

  emit(config.output, &transitions, |t| {
    if t.is_empty() {
      format!("No transitions available for {issue_key}.")
    } else {
      render::transition_table(t)
    }
  })
}

fn handle_transition_command(config: &Config, issue_key: &str, transition: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let applied = rt
    .block_on(client.transition_issue(issue_key, transition))
    .with_context(|| format!("Failed to transition issue {issue_key}"))?;

  if config.output.is_json() {
    return emit_json(&applied);
  }
  let target = applied.to.as_ref().map_or(applied.name.as_str(), |s| s.name.as_str());
  print_success(&format!(
    "Issue {} transitioned to {}",
    issue_key.bright_blue(),
    target.bright_green()
  ));
  Ok(())
}

fn handle_my_issues_command(config: &Config) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let result = rt.block_on(client.my_issues()).context("Failed to get your issues")?;
  print_search_result(config, &result)
}

fn handle_sprint_issues_command(config: &Config, project: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let result = rt
    .block_on(client.sprint_issues(project))
    .with_context(|| format!("Failed to get sprint issues for {project}"))?;
  print_search_result(config, &result)
}

fn handle_boards_command(config: &Config, project: Option<&str>) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let boards = rt.block_on(client.get_boards(project)).context("Failed to get boards")?;

  emit(config.output, &boards, |b| {
    if b.values.is_empty() {
      "No boards found.".to_string()
    } else {
      render::board_table(&b.values)
    }
  })
}

fn handle_sprints_command(config: &Config, board: u64, state: Option<&str>) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let sprints = rt
    .block_on(client.get_sprints(board, state))
    .with_context(|| format!("Failed to get sprints for board {board}"))?;

  emit(config.output, &sprints, |s| {
    if s.values.is_empty() {
      format!("No sprints found for board {board}.")
    } else {
      render::sprint_table(&s.values)
    }
  })
}

fn handle_fields_command(config: &Config, name: Option<&str>, custom_only: bool) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let fields = rt.block_on(client.get_fields()).context("Failed to get fields")?;
  let fields = filter_fields(fields, name, custom_only);

  emit(config.output, &fields, |f| {
    if f.is_empty() {
      "No fields match.".to_string()
    } else {
      render::field_table(f)
    }
  })
}

fn handle_users_command(config: &Config, query: &str) -> Result<()> {
  let (rt, client) = clients::create_jira_runtime_and_client(config)?;

  let users = rt
    .block_on(client.search_users(query))
    .with_context(|| format!("Failed to search users matching {query}"))?;

  let mode = client.mode();
  emit(config.output, &users, |u| {
    if u.is_empty() {
      format!("No users found matching {query}.")
    } else {
      render::user_table(u, mode)
    }
  })
}
