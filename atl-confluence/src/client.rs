//! # Confluence HTTP Client
//!
//! Thin wrapper binding a [`Transport`] to the Confluence REST API root.

use atl_core::{BearerAuth, RestTransport, Result, Transport};

use crate::consts::API_ROOT;

/// Represents a Confluence API client
#[derive(Debug, Clone)]
pub struct ConfluenceClient<T = RestTransport> {
  pub(crate) api: T,
}

impl ConfluenceClient<RestTransport> {
  /// Create a new Confluence client for `base_url` authenticated with a
  /// bearer token
  pub fn new(base_url: &str, token: &str) -> Result<Self> {
    let api = RestTransport::new(base_url, API_ROOT, BearerAuth::new(token))?;
    Ok(Self::with_transport(api))
  }

  /// Normalized base URL the client talks to
  pub fn base_url(&self) -> &str {
    self.api.base_url()
  }

  /// Absolute browser URL for a relative `webui` link
  pub fn web_url(&self, webui: &str) -> String {
    format!("{}{}", self.base_url(), webui)
  }
}

impl<T: Transport> ConfluenceClient<T> {
  /// Create a client from an already-built transport
  pub fn with_transport(api: T) -> Self {
    Self { api }
  }
}

/// Create a Confluence client from a base URL and token
pub fn create_confluence_client(base_url: &str, token: &str) -> Result<ConfluenceClient> {
  ConfluenceClient::new(base_url, token)
}
