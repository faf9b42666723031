use atl_core::{Method, Result, Transport, decode};
use tracing::instrument;

use crate::client::JiraClient;
use crate::models::Field;

/// Keep fields whose name contains `name` (ignoring case) and, when
/// `custom_only` is set, only custom fields
pub fn filter_fields(fields: Vec<Field>, name: Option<&str>, custom_only: bool) -> Vec<Field> {
  let needle = name.map(str::to_lowercase);
  fields
    .into_iter()
    .filter(|f| !custom_only || f.custom)
    .filter(|f| match &needle {
      Some(needle) => f.name.to_lowercase().contains(needle.as_str()),
      None => true,
    })
    .collect()
}

impl<T: Transport> JiraClient<T> {
  /// List every field definition, system and custom
  #[instrument(skip(self), level = "debug")]
  pub async fn get_fields(&self) -> Result<Vec<Field>> {
    let data = self.rest.request(Method::GET, "/field", None).await?;
    decode(&data, "fields")
  }
}
