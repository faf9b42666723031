use atl_core::url::with_query;
use atl_core::{ApiError, Method, Result, Transport, decode};
use tracing::{debug, instrument, warn};

use crate::client::JiraClient;
use crate::consts::USER_SEARCH_LIMIT;
use crate::models::{Assignee, ResolvedUser, UserSearchResult};

impl<T: Transport> JiraClient<T> {
  /// Search users by name, username or email
  #[instrument(skip(self), level = "debug")]
  pub async fn search_users(&self, query: &str) -> Result<Vec<UserSearchResult>> {
    let path = with_query(
      "/user/search",
      &[(self.mode.user_search_param(), query), ("maxResults", USER_SEARCH_LIMIT)],
    );
    let data = self.rest.request(Method::GET, &path, None).await?;
    decode(&data, "users")
  }

  /// Turn user input into the identifier assignment expects.
  ///
  /// Input containing `@` is treated as an email address and looked up;
  /// anything else is taken to be an identifier already and returned as is.
  /// When several users match an email the first one is used.
  #[instrument(skip(self), level = "debug")]
  pub async fn resolve_user(&self, input: &str) -> Result<ResolvedUser> {
    if !input.contains('@') {
      return Ok(ResolvedUser {
        identifier: input.to_string(),
        display_name: None,
        matches: 0,
      });
    }

    let users = self.search_users(input).await?;
    let first = users
      .first()
      .ok_or_else(|| ApiError::UserNotFound(input.to_string()))?;
    if users.len() > 1 {
      warn!(email = input, matches = users.len(), chosen = %first.display_name, "Email matched several users, using the first");
    }

    let identifier = first
      .identifier(self.mode)
      .ok_or_else(|| ApiError::UserNotFound(input.to_string()))?;
    debug!(email = input, identifier, "Resolved user");

    Ok(ResolvedUser {
      identifier: identifier.to_string(),
      display_name: Some(first.display_name.clone()),
      matches: users.len(),
    })
  }

  /// Assign an issue to a user, or clear its assignee
  #[instrument(skip(self), level = "debug")]
  pub async fn assign_issue(&self, issue_key: &str, assignee: &Assignee) -> Result<()> {
    let body = assignee.to_body(self.mode);
    self
      .rest
      .request(Method::PUT, &format!("/issue/{issue_key}/assignee"), Some(&body))
      .await?;
    Ok(())
  }
}
