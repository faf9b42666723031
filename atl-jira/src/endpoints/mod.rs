//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource type. Each module adds
//! methods to [`crate::JiraClient`].

pub mod agile;
pub mod comments;
pub mod fields;
pub mod issues;
pub mod transitions;
pub mod users;
