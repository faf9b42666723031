//! Constants for the atl CLI
//!
//! Environment variable names, config file location and command defaults.

/// Bearer token for Jira
pub const ENV_JIRA_TOKEN: &str = "JIRA_TOKEN";

/// Base URL of the Jira instance
pub const ENV_JIRA_BASE_URL: &str = "JIRA_BASE_URL";

/// Bearer token for Confluence
pub const ENV_CONFLUENCE_TOKEN: &str = "CONFLUENCE_TOKEN";

/// Base URL of the Confluence instance
pub const ENV_CONFLUENCE_BASE_URL: &str = "CONFLUENCE_BASE_URL";

/// Jira deployment flavour, `cloud` or `server`
pub const ENV_JIRA_DEPLOYMENT: &str = "JIRA_DEPLOYMENT";

/// Default output format, `text` or `json`
pub const ENV_OUTPUT: &str = "ATL_OUTPUT";

/// Explicit path of the config file
pub const ENV_CONFIG: &str = "ATL_CONFIG";

/// Name of the config file inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default issue type for `jira create`
pub const DEFAULT_ISSUE_TYPE: &str = "Story";

/// Column widths used when truncating text in tables
pub const SUMMARY_WIDTH: usize = 50;
pub const PAGE_TITLE_WIDTH: usize = 60;
pub const SEARCH_TITLE_WIDTH: usize = 50;
pub const SPACE_NAME_WIDTH: usize = 40;
pub const FIELD_VALUE_WIDTH: usize = 60;
