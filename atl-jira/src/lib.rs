//! # Jira API Client
//!
//! Jira REST and Agile API integration: issues, comments, transitions, user
//! lookup and assignment, field definitions, boards and sprints. Every
//! operation goes through a [`atl_core::Transport`], so the same code runs
//! against the network or an in-memory stub.

mod client;
pub mod consts;
mod endpoints;
pub mod models;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use endpoints::fields::filter_fields;
pub use endpoints::transitions::match_transition;
// Re-export models
pub use models::{
  Assignee, Board, Comment, Comments, CreatedIssue, DeploymentMode, Field, FieldUpdate, Issue, IssueField,
  IssueFields, NewIssue, Paged, ResolvedUser, SearchResult, Sprint, Transition, UserSearchResult,
};
