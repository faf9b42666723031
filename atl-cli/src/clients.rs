//! # Client Creation
//!
//! Centralized client creation for Jira and Confluence. Credentials come from
//! the resolved [`Config`], whose credentials were already checked when the
//! command group was entered.

use anyhow::{Context, Result};
use atl_confluence::{ConfluenceClient, create_confluence_client};
use atl_jira::{JiraClient, create_jira_client};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::Config;

/// Creates an authenticated Jira client from the configuration
pub fn create_jira_client_from_config(config: &Config) -> Result<JiraClient> {
  let credentials = config.jira_credentials()?;
  debug!(base_url = %credentials.base_url, mode = %config.jira_deployment, "Creating Jira client");

  create_jira_client(&credentials.base_url, &credentials.token, config.jira_deployment)
    .context("Failed to create Jira client")
}

/// Creates an authenticated Confluence client from the configuration
pub fn create_confluence_client_from_config(config: &Config) -> Result<ConfluenceClient> {
  let credentials = config.confluence_credentials()?;
  debug!(base_url = %credentials.base_url, "Creating Confluence client");

  create_confluence_client(&credentials.base_url, &credentials.token).context("Failed to create Confluence client")
}

/// Creates a tokio runtime and an authenticated Jira client
///
/// This is a convenience function for CLI commands that need both a runtime
/// and a Jira client.
pub fn create_jira_runtime_and_client(config: &Config) -> Result<(Runtime, JiraClient)> {
  let client = create_jira_client_from_config(config)?;
  let rt = Runtime::new().context("Failed to create async runtime")?;
  Ok((rt, client))
}

/// Creates a tokio runtime and an authenticated Confluence client
pub fn create_confluence_runtime_and_client(config: &Config) -> Result<(Runtime, ConfluenceClient)> {
  let client = create_confluence_client_from_config(config)?;
  let rt = Runtime::new().context("Failed to create async runtime")?;
  Ok((rt, client))
}
