//! # Confluence Command
//!
//! Derive-based implementation of the Confluence command group: reading,
//! creating, updating and deleting pages, listing spaces and their pages,
//! and CQL search.

use anyhow::{Context, Result, bail};
use atl_confluence::consts::{DEFAULT_LIMIT, DEFAULT_PAGE_BODY, PAGE_EXPAND, SEARCH_EXPAND};
use atl_confluence::{BodyFormat, ConfluenceClient, NewPage, Page, PageRevision};
use atl_core::{print_success, print_warning};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::{emit, emit_json};
use crate::clients;
use crate::config::Config;
use crate::input::read_stdin;
use crate::render;

/// Command for Confluence integration
#[derive(Args)]
pub struct ConfluenceArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfluenceSubcommands,
}

/// Subcommands for the Confluence command
#[derive(Subcommand)]
pub enum ConfluenceSubcommands {
  /// Show a page
  #[command(long_about = "Display a Confluence page.\n\n\
                   Shows title, space, version and author. Use --body-format to include\n\
                   the page body in storage (XHTML) or rendered view format.")]
  Get {
    /// Page id
    #[arg(required = true, index = 1)]
    page_id: String,

    /// Include the body in this format (storage or view)
    #[arg(long)]
    body_format: Option<BodyFormat>,
  },

  /// Search content with CQL
  #[command(long_about = "Search Confluence content with a CQL query.\n\n\
                   Example: atl confluence search \"space = ENG AND title ~ 'release'\"")]
  Search {
    /// The CQL query
    #[arg(required = true, index = 1)]
    cql: String,

    /// Maximum number of results
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,
  },

  /// List the pages of a space
  Pages {
    /// Space key
    #[arg(short = 's', long, required = true)]
    space: String,

    /// Maximum number of pages
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,
  },

  /// List spaces, or show one space
  Spaces {
    /// Space key to show
    #[arg(index = 1)]
    space_key: Option<String>,

    /// Maximum number of spaces
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,
  },

  /// Create a page
  #[command(long_about = "Create a new Confluence page in a space.\n\n\
                   The storage-format body is read from stdin with --stdin; otherwise the\n\
                   page starts with placeholder content.\n\n\
                   Example: echo \"<p>Content</p>\" | atl confluence create -s ENG -t \"Page\" --stdin")]
  Create {
    /// Space key
    #[arg(short = 's', long, required = true)]
    space: String,

    /// Page title
    #[arg(short = 't', long, required = true)]
    title: String,

    /// Parent page id
    #[arg(long)]
    parent: Option<String>,

    /// Read the body from stdin
    #[arg(long)]
    stdin: bool,
  },

  /// Update a page's title or body
  #[command(long_about = "Update a Confluence page.\n\n\
                   The current page is fetched first; its title and body are kept unless\n\
                   replaced with --title or --stdin. At least one of the two is required.\n\
                   The version number is incremented automatically.")]
  Update {
    /// Page id
    #[arg(required = true, index = 1)]
    page_id: String,

    /// New title
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Version message
    #[arg(long)]
    message: Option<String>,

    /// Read the new body from stdin
    #[arg(long)]
    stdin: bool,
  },

  /// Delete a page
  Delete {
    /// Page id
    #[arg(required = true, index = 1)]
    page_id: String,
  },
}

/// Result of `delete` in JSON mode
#[derive(Serialize)]
struct DeleteOutcome<'a> {
  id: &'a str,
  deleted: bool,
}

/// Handle the Confluence command
pub(crate) fn handle_confluence_command(confluence: ConfluenceArgs, config: &Config) -> Result<()> {
  match confluence.subcommand {
    ConfluenceSubcommands::Get { page_id, body_format } => handle_get_command(config, &page_id, body_format),
    ConfluenceSubcommands::Search { cql, limit } => handle_search_command(config, &cql, limit),
    ConfluenceSubcommands::Pages { space, limit } => handle_pages_command(config, &space, limit),
    ConfluenceSubcommands::Spaces { space_key, limit } => match space_key {
      Some(key) => handle_space_command(config, &key),
      None => handle_spaces_command(config, limit),
    },
    ConfluenceSubcommands::Create {
      space,
      title,
      parent,
      stdin,
    } => {
      if title.trim().is_empty() {
        bail!("--title must not be empty");
      }
      let body = if stdin {
        read_stdin()?
      } else {
        DEFAULT_PAGE_BODY.to_string()
      };
      let page = NewPage {
        space_key: space,
        title,
        body,
        parent_id: parent.filter(|p| !p.is_empty()),
      };
      handle_create_command(config, &page)
    }
    ConfluenceSubcommands::Update {
      page_id,
      title,
      message,
      stdin,
    } => {
      let revision = PageRevision {
        title: title.filter(|t| !t.is_empty()),
        body: if stdin { Some(read_stdin()?) } else { None },
        message: message.filter(|m| !m.is_empty()),
      };
      if revision.is_empty() {
        bail!("must specify --title or --stdin");
      }
      handle_update_command(config, &page_id, &revision)
    }
    ConfluenceSubcommands::Delete { page_id } => handle_delete_command(config, &page_id),
  }
}

/// Expansions for `get`: version and space, plus the requested body
fn get_expansions(body_format: Option<BodyFormat>) -> Vec<String> {
  let mut expand: Vec<String> = PAGE_EXPAND.iter().map(|e| e.to_string()).collect();
  if let Some(format) = body_format {
    expand.push(format.expand());
  }
  expand
}

fn page_url(client: &ConfluenceClient, page: &Page) -> String {
  page
    .links
    .webui
    .as_deref()
    .map_or_else(|| "-".to_string(), |webui| client.web_url(webui))
}

fn handle_get_command(config: &Config, page_id: &str, body_format: Option<BodyFormat>) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let expand = get_expansions(body_format);
  let expand: Vec<&str> = expand.iter().map(String::as_str).collect();
  let page = rt
    .block_on(client.get_page(page_id, &expand))
    .with_context(|| format!("Failed to get page {page_id}"))?;

  let url = page_url(&client, &page);
  emit(config.output, &page, |p| render::page_details(p, body_format, &url))
}

fn handle_search_command(config: &Config, cql: &str, limit: u32) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let results = rt
    .block_on(client.search_content(cql, SEARCH_EXPAND, limit))
    .context("Failed to search content")?;

  emit(config.output, &results, |r| {
    if r.results.is_empty() {
      "No results found.".to_string()
    } else {
      format!("{}\n{} results", render::search_table(&r.results), r.size)
    }
  })
}

fn handle_pages_command(config: &Config, space: &str, limit: u32) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let pages = rt
    .block_on(client.get_space_pages(space, limit))
    .with_context(|| format!("Failed to get pages of space {space}"))?;

  emit(config.output, &pages, |p| {
    if p.results.is_empty() {
      format!("No pages found in space {space}.")
    } else {
      format!("{}\n{} pages", render::page_table(&p.results), p.size)
    }
  })
}

fn handle_space_command(config: &Config, space_key: &str) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let space = rt
    .block_on(client.get_space(space_key))
    .with_context(|| format!("Failed to get space {space_key}"))?;

  emit(config.output, &space, render::space_details)
}

fn handle_spaces_command(config: &Config, limit: u32) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let spaces = rt.block_on(client.list_spaces(limit)).context("Failed to list spaces")?;

  emit(config.output, &spaces, |s| {
    if s.results.is_empty() {
      "No spaces found.".to_string()
    } else {
      render::space_table(&s.results)
    }
  })
}

fn handle_create_command(config: &Config, page: &NewPage) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let created = rt
    .block_on(client.create_page(page))
    .with_context(|| format!("Failed to create page in space {}", page.space_key))?;

  if config.output.is_json() {
    return emit_json(&created);
  }
  print_success(&format!("Page {} created successfully!", created.title.bright_blue()));
  println!("ID: {}", created.id);
  println!("URL: {}", page_url(&client, &created));
  Ok(())
}

fn handle_update_command(config: &Config, page_id: &str, revision: &PageRevision) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  let updated = rt
    .block_on(client.revise_page(page_id, revision))
    .with_context(|| format!("Failed to update page {page_id}"))?;

  if config.output.is_json() {
    return emit_json(&updated);
  }
  print_success(&format!("Page {} updated successfully!", updated.title.bright_blue()));
  match updated.version_number() {
    Some(version) => println!("Version: {version}"),
    None => print_warning("The server did not report the new version number"),
  }
  println!("URL: {}", page_url(&client, &updated));
  Ok(())
}

fn handle_delete_command(config: &Config, page_id: &str) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(config)?;

  rt.block_on(client.delete_page(page_id))
    .with_context(|| format!("Failed to delete page {page_id}"))?;

  if config.output.is_json() {
    return emit_json(&DeleteOutcome {
      id: page_id,
      deleted: true,
    });
  }
  print_success(&format!("Page {page_id} deleted"));
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;
  use crate::cli::{Cli, Commands};

  fn parse(args: &[&str]) -> ConfluenceSubcommands {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
      Commands::Confluence(confluence) => confluence.subcommand,
      _ => panic!("expected a confluence command"),
    }
  }

  #[test]
  fn test_get_parses_body_format() {
    match parse(&["atl", "conf", "get", "123", "--body-format", "view"]) {
      ConfluenceSubcommands::Get { body_format, .. } => assert_eq!(body_format, Some(BodyFormat::View)),
      _ => panic!("expected get"),
    }
    assert!(Cli::try_parse_from(["atl", "conf", "get", "123", "--body-format", "wiki"]).is_err());
  }

  #[test]
  fn test_get_expansions() {
    assert_eq!(get_expansions(None), vec!["version", "space"]);
    assert_eq!(
      get_expansions(Some(BodyFormat::Storage)),
      vec!["version", "space", "body.storage"]
    );
  }

  #[test]
  fn test_listing_limits_default() {
    match parse(&["atl", "confluence", "spaces"]) {
      ConfluenceSubcommands::Spaces { space_key, limit } => {
        assert_eq!(space_key, None);
        assert_eq!(limit, DEFAULT_LIMIT);
      }
      _ => panic!("expected spaces"),
    }
  }

  #[test]
  fn test_update_without_title_or_stdin_fails() {
    let config = Config::default();
    let update = ConfluenceArgs {
      subcommand: parse(&["atl", "conf", "update", "123", "--message", "tweak"]),
    };

    let err = handle_confluence_command(update, &config).unwrap_err();
    assert_eq!(err.to_string(), "must specify --title or --stdin");
  }

  #[test]
  fn test_missing_credentials_name_the_variable() {
    let config = Config::default();
    let delete = ConfluenceArgs {
      subcommand: parse(&["atl", "conf", "delete", "123"]),
    };

    let err = handle_confluence_command(delete, &config).unwrap_err();
    assert!(err.to_string().contains("CONFLUENCE_TOKEN"));
  }
}
