//! In-memory transport for exercising resource operations without a network

use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex};

use atl_core::{ApiError, Method, Transport};
use serde_json::Value;

/// A request captured by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
  /// Label of the transport that saw the request (e.g. `rest`, `agile`)
  pub root: String,
  pub method: Method,
  pub path: String,
  pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
  requests: Mutex<Vec<RecordedRequest>>,
  responses: Mutex<VecDeque<Result<Vec<u8>, ApiError>>>,
}

/// Transport stub that records requests and replays queued responses in
/// order.
///
/// Clones share state, so a test can hand one clone to a client and keep
/// another to inspect what was sent. When the queue is empty the stub answers
/// with an empty body.
#[derive(Clone)]
pub struct RecordingTransport {
  root: String,
  inner: Arc<Inner>,
}

impl Default for RecordingTransport {
  fn default() -> Self {
    Self::new()
  }
}

impl RecordingTransport {
  pub fn new() -> Self {
    Self {
      root: "rest".to_string(),
      inner: Arc::new(Inner::default()),
    }
  }

  /// A clone sharing the same queue and log but tagging requests with a
  /// different root label
  pub fn for_root(&self, root: &str) -> Self {
    Self {
      root: root.to_string(),
      inner: Arc::clone(&self.inner),
    }
  }

  /// Queue a JSON response
  pub fn push_json(&self, value: Value) -> &Self {
    let bytes = serde_json::to_vec(&value).expect("Failed to serialize canned response");
    self.push_raw(bytes)
  }

  /// Queue a raw response body
  pub fn push_raw(&self, bytes: Vec<u8>) -> &Self {
    self.responses().push_back(Ok(bytes));
    self
  }

  /// Queue an empty (204-style) response
  pub fn push_empty(&self) -> &Self {
    self.push_raw(Vec::new())
  }

  /// Queue an API error response
  pub fn push_status(&self, status: u16, body: &str) -> &Self {
    self.responses().push_back(Err(ApiError::Status {
      status,
      body: body.to_string(),
    }));
    self
  }

  /// Every request seen so far, in order
  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.inner.requests.lock().expect("request log poisoned").clone()
  }

  /// Number of requests seen so far
  pub fn call_count(&self) -> usize {
    self.inner.requests.lock().expect("request log poisoned").len()
  }

  fn responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Vec<u8>, ApiError>>> {
    self.inner.responses.lock().expect("response queue poisoned")
  }
}

impl Transport for RecordingTransport {
  fn request(
    &self,
    method: Method,
    path: &str,
    body: Option<&Value>,
  ) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send {
    self
      .inner
      .requests
      .lock()
      .expect("request log poisoned")
      .push(RecordedRequest {
        root: self.root.clone(),
        method,
        path: path.to_string(),
        body: body.cloned(),
      });

    let response = self.responses().pop_front().unwrap_or_else(|| Ok(Vec::new()));
    ready(response)
  }
}
