use atl_core::url::with_query;
use atl_core::{Method, Result, Transport, decode};
use tracing::{debug, instrument};

use crate::client::ConfluenceClient;
use crate::models::{Page, Results};

impl<T: Transport> ConfluenceClient<T> {
  /// Search content with CQL
  #[instrument(skip(self), level = "debug")]
  pub async fn search_content(&self, cql: &str, expand: &[&str], limit: u32) -> Result<Results<Page>> {
    let limit = limit.to_string();
    let expand = expand.join(",");
    let mut params = vec![("cql", cql), ("limit", limit.as_str())];
    if !expand.is_empty() {
      params.push(("expand", expand.as_str()));
    }

    let data = self
      .api
      .request(Method::GET, &with_query("/content/search", &params), None)
      .await?;
    let results: Results<Page> = decode(&data, "search results")?;
    debug!(size = results.size, "Search completed");
    Ok(results)
  }
}
