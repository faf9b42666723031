//! # atl CLI Library
//!
//! Command tree, configuration and rendering for the `atl` command-line
//! client. Each subcommand validates its flags, calls one Jira or Confluence
//! operation and prints the result as a table or as JSON.

pub mod cli;
pub mod clients;
pub mod completion;
pub mod config;
pub mod consts;
pub mod input;
pub mod render;
pub mod update;
