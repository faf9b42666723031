//! Temporary config files for configuration tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A config directory holding a `config.toml` that is removed on drop
pub struct ConfigFileGuard {
  /// The temporary directory containing the config file
  pub temp_dir: TempDir,
  path: PathBuf,
}

impl ConfigFileGuard {
  /// Write `contents` to `config.toml` inside a fresh temporary directory
  pub fn new(contents: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write config file");

    Self { temp_dir, path }
  }

  /// Path of the written config file
  pub fn path(&self) -> &Path {
    &self.path
  }
}
