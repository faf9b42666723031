//! # Shell Completion
//!
//! Generates shell completion scripts so `atl` subcommands and flags
//! tab-complete in bash, zsh, fish and PowerShell.

use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Generate shell completions for the specified shell on stdout
pub fn generate_completions(shell: Shell) -> Result<()> {
  generate_completions_to(shell, &mut io::stdout());
  Ok(())
}

/// Generate shell completions into any writer
pub fn generate_completions_to(shell: Shell, out: &mut dyn io::Write) {
  let mut cmd = Cli::command();
  let app_name = cmd.get_name().to_string();

  generate(shell, &mut cmd, app_name, out);
}

#[cfg(test)]
mod tests {
  use clap_complete::Shell;

  use super::generate_completions_to;

  #[test]
  fn test_generate_completions_succeeds() {
    let shells = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

    for shell in shells {
      let mut buf = Vec::new();
      generate_completions_to(shell, &mut buf);
      let script = String::from_utf8(buf).unwrap();
      assert!(script.contains("atl"), "Completion for {shell:?} does not mention atl");
    }
  }

  #[test]
  fn test_bash_completion_lists_groups() {
    let mut buf = Vec::new();
    generate_completions_to(Shell::Bash, &mut buf);
    let script = String::from_utf8(buf).unwrap();

    assert!(script.contains("jira"));
    assert!(script.contains("confluence"));
  }
}
