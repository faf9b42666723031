//! # Confluence API Endpoints
//!
//! Endpoint implementations grouped by resource type. Each module adds
//! methods to [`crate::ConfluenceClient`].

pub mod pages;
pub mod search;
pub mod spaces;
