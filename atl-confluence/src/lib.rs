//! # Confluence API Client
//!
//! Confluence REST API integration for pages, spaces and CQL search. Page
//! updates take care of the version arithmetic the API requires.

pub mod client;
pub mod consts;
pub mod endpoints;
pub mod models;

// Re-export the client
pub use client::{ConfluenceClient, create_confluence_client};
// Re-export models
pub use models::{
  BodyContent, BodyFormat, Links, NewPage, Page, PageBody, PageRevision, PageUpdate, Results, Space, Version,
};
