//! Constants for the atl-confluence client.

/// API root of the Confluence REST API
pub const API_ROOT: &str = "/rest/api";

/// Content type of regular pages
pub const PAGE_TYPE: &str = "page";

/// Representation used for every body the client writes
pub const STORAGE_REPRESENTATION: &str = "storage";

/// Body used by `create` when none is supplied
pub const DEFAULT_PAGE_BODY: &str = "<p>New page content</p>";

/// Expansions needed to rewrite a page in place
pub const REVISE_EXPAND: &[&str] = &["body.storage", "version"];

/// Expansions always requested when showing a single page
pub const PAGE_EXPAND: &[&str] = &["version", "space"];

/// Expansions requested for search results
pub const SEARCH_EXPAND: &[&str] = &["space", "version"];

/// Default page size for listings and searches
pub const DEFAULT_LIMIT: u32 = 25;
