use atl_core::{ApiError, Method, Result, Transport, decode, to_body};
use tracing::{info, instrument};

use crate::client::JiraClient;
use crate::models::{Transition, TransitionId, TransitionRequest, Transitions};

/// Pick the transition a user asked for.
///
/// `requested` matches a transition whose id is exactly equal or whose name
/// is equal ignoring case; the first match in list order wins.
pub fn match_transition<'a>(transitions: &'a [Transition], requested: &str) -> Result<&'a Transition> {
  transitions
    .iter()
    .find(|t| t.id == requested || t.name.eq_ignore_ascii_case(requested))
    .ok_or_else(|| ApiError::TransitionNotFound {
      requested: requested.to_string(),
      available: transitions.iter().map(Transition::label).collect(),
    })
}

impl<T: Transport> JiraClient<T> {
  /// Get available transitions for an issue
  #[instrument(skip(self), level = "debug")]
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>> {
    let data = self
      .rest
      .request(Method::GET, &format!("/issue/{issue_key}/transitions"), None)
      .await?;
    let transitions: Transitions = decode(&data, "transitions")?;
    Ok(transitions.transitions)
  }

  /// Transition an issue by transition name or id.
  ///
  /// Fetches the available transitions first, so an unknown name fails
  /// before anything is posted. Returns the transition that was applied.
  #[instrument(skip(self), level = "debug")]
  pub async fn transition_issue(&self, issue_key: &str, name_or_id: &str) -> Result<Transition> {
    let transitions = self.get_transitions(issue_key).await?;
    let transition = match_transition(&transitions, name_or_id)?.clone();

    let request = to_body(&TransitionRequest {
      transition: TransitionId {
        id: transition.id.clone(),
      },
    })?;
    self
      .rest
      .request(Method::POST, &format!("/issue/{issue_key}/transitions"), Some(&request))
      .await?;

    info!(issue_key, transition = %transition.name, "Transitioned issue");
    Ok(transition)
  }
}
