//! Error types shared by the Jira and Confluence clients.

use thiserror::Error;

/// Errors that can occur when talking to an Atlassian REST API.
///
/// The variants keep "the server rejected the request" ([`ApiError::Status`])
/// apart from "the server answered with something we could not read"
/// ([`ApiError::Decode`]) so callers can tell the two cases apart.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The configured base URL could not be used.
  #[error("invalid base URL '{url}': {reason}")]
  InvalidUrl { url: String, reason: String },

  /// The HTTP client could not be constructed.
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// Network failure, timeout or refused connection.
  #[error("request failed: {0}")]
  Request(#[source] reqwest::Error),

  /// A gzip- or deflate-encoded response body could not be inflated.
  #[error("failed to decompress response: {0}")]
  Gzip(#[source] std::io::Error),

  /// The server answered with a status code of 400 or above.
  #[error("API error (status {status}): {body}")]
  Status { status: u16, body: String },

  /// A request body could not be serialized.
  #[error("failed to marshal body: {0}")]
  Encode(#[source] serde_json::Error),

  /// A response body did not match the expected shape.
  #[error("failed to parse {what}: {source}")]
  Decode {
    what: &'static str,
    #[source]
    source: serde_json::Error,
  },

  /// No transition matched the requested name or id.
  #[error("transition '{requested}' not found. Available: {}", .available.join(", "))]
  TransitionNotFound { requested: String, available: Vec<String> },

  /// A user lookup by email returned nothing.
  #[error("no user found with email: {0}")]
  UserNotFound(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
  /// HTTP status code carried by an API error, if any.
  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Whether this error came from a response body that failed to decode.
  pub fn is_decode(&self) -> bool {
    matches!(self, ApiError::Decode { .. })
  }
}
