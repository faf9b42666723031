//! Constants for the atl-jira client.

/// API root of the Jira REST API
pub const REST_API_ROOT: &str = "/rest/api/2";

/// API root of the Jira Agile API (boards and sprints)
pub const AGILE_API_ROOT: &str = "/rest/agile/1.0";

/// Custom field that holds story points unless overridden
pub const DEFAULT_STORY_POINTS_FIELD: &str = "customfield_10106";

/// Fields requested by issue searches
pub const SEARCH_FIELDS: &str = "key,summary,status,priority,assignee,customfield_10106";

/// Page size used by `search` when none is given
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// JQL for issues assigned to the caller that are not done yet
pub const MY_ISSUES_JQL: &str = "assignee = currentUser() AND status NOT IN (Done, Closed, Listo, CERRADO)";

/// Page size used when listing the issues of the open sprints
pub const SPRINT_ISSUES_LIMIT: u32 = 100;

/// Page size for user searches
pub const USER_SEARCH_LIMIT: &str = "50";

/// Page size for board listings
pub const BOARD_LIMIT: &str = "100";

/// Page size for sprint listings
pub const SPRINT_LIMIT: &str = "50";
