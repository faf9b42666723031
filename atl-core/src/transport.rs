//! # REST Transport
//!
//! One bearer-token HTTP transport shared by the Jira and Confluence clients.
//! A transport is bound to a base URL and an API root (`/rest/api/2`,
//! `/rest/agile/1.0`, `/rest/api`, ...); resource operations hand it a path
//! and an optional JSON body and get the raw response bytes back.

use std::fmt;
use std::future::Future;
use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};
pub use reqwest::Method;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::consts::{ACCEPTED_ENCODINGS, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{ApiError, Result};
use crate::url::normalize_base_url;

/// Static bearer credential attached to every outbound request
#[derive(Clone, PartialEq, Eq)]
pub struct BearerAuth {
  token: String,
}

impl BearerAuth {
  /// Create a bearer credential, trimming surrounding whitespace
  pub fn new(token: &str) -> Self {
    Self {
      token: token.trim().to_string(),
    }
  }

  /// Value for the `Authorization` header
  pub fn header_value(&self) -> String {
    format!("Bearer {}", self.token)
  }
}

impl fmt::Debug for BearerAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
  }
}

/// Issues one request against an API root and returns the response body.
///
/// `body: None` sends no request body at all, which is different from
/// sending an empty JSON object.
pub trait Transport {
  fn request(&self, method: Method, path: &str, body: Option<&Value>) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Production transport backed by `reqwest`
#[derive(Clone, Debug)]
pub struct RestTransport {
  client: Client,
  base_url: String,
  api_root: String,
  auth: BearerAuth,
}

/// Build the shared HTTP client with the fixed request timeout
pub fn build_http_client() -> Result<Client> {
  Client::builder()
    .timeout(REQUEST_TIMEOUT)
    .user_agent(USER_AGENT)
    .build()
    .map_err(ApiError::Client)
}

impl RestTransport {
  /// Create a transport with its own HTTP client
  pub fn new(base_url: &str, api_root: &str, auth: BearerAuth) -> Result<Self> {
    Self::with_client(build_http_client()?, base_url, api_root, auth)
  }

  /// Create a transport reusing an existing HTTP client and its connection
  /// pool
  pub fn with_client(client: Client, base_url: &str, api_root: &str, auth: BearerAuth) -> Result<Self> {
    Ok(Self {
      client,
      base_url: normalize_base_url(base_url)?,
      api_root: api_root.to_string(),
      auth,
    })
  }

  /// Derive a transport for another API root on the same host
  pub fn for_root(&self, api_root: &str) -> Self {
    Self {
      api_root: api_root.to_string(),
      ..self.clone()
    }
  }

  /// Base URL without trailing slash
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// API root prefixed to every path
  pub fn api_root(&self) -> &str {
    &self.api_root
  }

  /// Fully-qualified URL for an endpoint path
  pub fn endpoint_url(&self, path: &str) -> String {
    format!("{}{}{}", self.base_url, self.api_root, path)
  }
}

impl Transport for RestTransport {
  async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Vec<u8>> {
    let url = self.endpoint_url(path);
    debug!(%method, %url, has_body = body.is_some(), "Sending API request");

    let mut request = self
      .client
      .request(method, &url)
      .header(AUTHORIZATION, self.auth.header_value())
      .header(ACCEPT, "application/json")
      .header(CONTENT_TYPE, "application/json")
      .header(ACCEPT_ENCODING, ACCEPTED_ENCODINGS);

    if let Some(body) = body {
      request = request.json(body);
    }

    let response = request.send().await.map_err(ApiError::Request)?;
    let status = response.status().as_u16();
    let encoding = response
      .headers()
      .get(CONTENT_ENCODING)
      .and_then(|value| value.to_str().ok())
      .map(str::to_owned);

    let raw = response.bytes().await.map_err(ApiError::Request)?;
    trace!(status, bytes = raw.len(), encoding = ?encoding, "Received API response");

    if status >= 400 {
      // An error body that fails to inflate is reported raw
      let body = decode_body(encoding.as_deref(), &raw).unwrap_or_else(|_| raw.to_vec());
      return Err(ApiError::Status {
        status,
        body: String::from_utf8_lossy(&body).into_owned(),
      });
    }

    decode_body(encoding.as_deref(), &raw)
  }
}

/// Inflate a response body according to its `Content-Encoding`
///
/// Handles the encodings advertised in [`ACCEPTED_ENCODINGS`]; anything else
/// is returned unchanged.
pub fn decode_body(content_encoding: Option<&str>, raw: &[u8]) -> Result<Vec<u8>> {
  let encoding = content_encoding.map(|e| e.trim().to_ascii_lowercase());
  let mut inflated = Vec::new();
  match encoding.as_deref() {
    Some("gzip") => GzDecoder::new(raw).read_to_end(&mut inflated),
    Some("deflate") => ZlibDecoder::new(raw).read_to_end(&mut inflated),
    _ => return Ok(raw.to_vec()),
  }
  .map_err(ApiError::Gzip)?;
  Ok(inflated)
}

/// Decode a JSON response body into a typed result
pub fn decode<T: DeserializeOwned>(data: &[u8], what: &'static str) -> Result<T> {
  serde_json::from_slice(data).map_err(|source| ApiError::Decode { what, source })
}

/// Serialize a typed request body
pub fn to_body<T: Serialize>(value: &T) -> Result<Value> {
  serde_json::to_value(value).map_err(ApiError::Encode)
}
