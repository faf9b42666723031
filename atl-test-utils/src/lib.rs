//! Test utilities shared across the atl workspace
//!
//! This crate provides common testing infrastructure including:
//! - An in-memory [`RecordingTransport`] that records every request and
//!   replays canned responses
//! - Canned JSON payloads for Jira and Confluence ([`fixtures`])
//! - Temporary config files ([`ConfigFileGuard`]) and gzip helpers
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod config;
pub mod fixtures;
pub mod transport;

use std::io::Write;

pub use config::ConfigFileGuard;
use flate2::Compression;
use flate2::write::GzEncoder;
pub use transport::{RecordedRequest, RecordingTransport};

/// Gzip-compress a payload the way a server would for
/// `Content-Encoding: gzip`
pub fn gzip(data: &[u8]) -> Vec<u8> {
  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder.write_all(data).expect("Failed to write gzip payload");
  encoder.finish().expect("Failed to finish gzip payload")
}
