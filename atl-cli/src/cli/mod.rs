//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the atl tool: one
//! command group per Atlassian product plus shell completion.

mod completion;
mod confluence;
mod jira;

use anyhow::{Context, Result};
use atl_core::{ColorMode, OutputFormat, print_json};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;

/// Top-level CLI command for the atl tool
#[derive(Parser)]
#[command(name = "atl")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "A command-line client for Jira and Confluence")]
#[command(
  long_about = "atl talks to the Jira and Confluence REST APIs with a bearer token.\n\n\
        Credentials come from JIRA_TOKEN / JIRA_BASE_URL and CONFLUENCE_TOKEN /\n\
        CONFLUENCE_BASE_URL, or from config.toml in the platform config directory.\n\
        Every command prints a table by default or indented JSON with --output json."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    global = true,
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Output format (text or json)
  #[arg(
    short = 'o',
    long = "output",
    global = true,
    value_enum,
    ignore_case = true,
    long_help = "Output format for command results.\n\n\
             Overrides ATL_OUTPUT and the `output` key of config.toml.\n\
             Defaults to text."
  )]
  pub output: Option<OutputFormat>,

  /// Controls when colored output is used
  #[arg(
    long,
    global = true,
    value_enum,
    ignore_case = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the atl tool
#[derive(Subcommand)]
pub enum Commands {
  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for atl commands.\n\n\
            Supported shells include bash, zsh, fish and PowerShell.")]
  Completion(completion::CompletionArgs),

  /// Confluence pages, spaces and search
  #[command(long_about = "Interact with Confluence pages and spaces.\n\n\
            Read, create, update and delete pages, list spaces and their pages,\n\
            and search content with CQL.")]
  #[command(alias = "conf")]
  #[command(arg_required_else_help = true)]
  Confluence(confluence::ConfluenceArgs),

  /// Jira issues, comments, transitions, boards and sprints
  #[command(long_about = "Interact with Jira issues and agile boards.\n\n\
            View, search, create and update issues, manage comments, assignees\n\
            and workflow transitions, and inspect boards, sprints and fields.")]
  #[command(alias = "j")]
  #[command(arg_required_else_help = true)]
  Jira(jira::JiraArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  // Set global color override based on --colors argument
  match cli.colors {
    ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
    ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
    ColorMode::Auto => {
      // Let owo_colors use its default auto-detection
    }
  }

  match cli.command {
    Commands::Completion(completion) => completion::handle_completion_command(completion),
    Commands::Confluence(confluence) => {
      let config = Config::load(cli.output)?;
      config.confluence_credentials()?;
      confluence::handle_confluence_command(confluence, &config)
    }
    Commands::Jira(jira) => {
      let config = Config::load(cli.output)?;
      config.jira_credentials()?;
      jira::handle_jira_command(jira, &config)
    }
  }
}

/// Print `value` as indented JSON, or the text rendering built by `text`
pub(crate) fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> Result<()>
where
  T: Serialize + ?Sized,
  F: FnOnce(&T) -> String,
{
  if format.is_json() {
    print_json(value).context("Failed to render JSON output")?;
  } else {
    println!("{}", text(value));
  }
  Ok(())
}

/// Print `value` as indented JSON
pub(crate) fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  print_json(value).context("Failed to render JSON output")
}
