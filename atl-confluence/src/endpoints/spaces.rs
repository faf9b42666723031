use atl_core::url::with_query;
use atl_core::{Method, Result, Transport, decode};
use tracing::instrument;

use crate::client::ConfluenceClient;
use crate::models::{Page, Results, Space};

impl<T: Transport> ConfluenceClient<T> {
  /// Get a space by key
  #[instrument(skip(self), level = "debug")]
  pub async fn get_space(&self, space_key: &str) -> Result<Space> {
    let data = self
      .api
      .request(Method::GET, &format!("/space/{space_key}"), None)
      .await?;
    decode(&data, "space")
  }

  /// List spaces visible to the caller
  #[instrument(skip(self), level = "debug")]
  pub async fn list_spaces(&self, limit: u32) -> Result<Results<Space>> {
    let limit = limit.to_string();
    let path = with_query("/space", &[("limit", limit.as_str())]);
    let data = self.api.request(Method::GET, &path, None).await?;
    decode(&data, "spaces")
  }

  /// List the pages of a space
  #[instrument(skip(self), level = "debug")]
  pub async fn get_space_pages(&self, space_key: &str, limit: u32) -> Result<Results<Page>> {
    let limit = limit.to_string();
    let path = with_query(&format!("/space/{space_key}/content/page"), &[("limit", limit.as_str())]);
    let data = self.api.request(Method::GET, &path, None).await?;
    decode(&data, "pages")
  }
}
