//! # Configuration
//!
//! Settings are resolved once at startup from three layers, lowest priority
//! first: an optional `config.toml` in the platform config directory, the
//! process environment, and command-line flags. The resulting [`Config`] is
//! passed by reference to every handler; nothing reads the environment after
//! this point.
//!
//! Loading never fails on missing credentials. Each command group checks its
//! own product's credentials on entry, before any of its commands run, so
//! `atl completion` works without any configuration.

use std::fs;
use std::path::{Path, PathBuf};

use atl_core::ApiError;
use atl_core::OutputFormat;
use atl_core::url::normalize_base_url;
use atl_jira::DeploymentMode;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_FILE_NAME, ENV_CONFIG, ENV_CONFLUENCE_BASE_URL, ENV_CONFLUENCE_TOKEN, ENV_JIRA_BASE_URL, ENV_JIRA_DEPLOYMENT,
  ENV_JIRA_TOKEN, ENV_OUTPUT,
};

/// Errors raised while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{var} is not set (export it or set `{key}` in config.toml)")]
  Missing { var: &'static str, key: &'static str },

  #[error("failed to read config file {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid Jira deployment '{0}': expected cloud or server")]
  InvalidDeployment(String),

  #[error("invalid output format '{0}': expected text or json")]
  InvalidOutput(String),

  #[error("invalid {var}: {source}")]
  InvalidBaseUrl {
    var: &'static str,
    #[source]
    source: ApiError,
  },
}

/// Contents of `config.toml`. Keys mirror the environment variables in
/// lowercase.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileConfig {
  pub jira_token: Option<String>,
  pub jira_base_url: Option<String>,
  pub confluence_token: Option<String>,
  pub confluence_base_url: Option<String>,
  pub jira_deployment: Option<String>,
  pub output: Option<String>,
}

impl FileConfig {
  /// Read and parse a config file
  pub fn read(path: &Path) -> Result<Self, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// Base URL and token for one product
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub base_url: String,
  pub token: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("base_url", &self.base_url)
      .field("token", &"<redacted>")
      .finish()
  }
}

/// Resolved settings for one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
  jira_token: Option<String>,
  jira_base_url: Option<String>,
  confluence_token: Option<String>,
  confluence_base_url: Option<String>,
  pub jira_deployment: DeploymentMode,
  pub output: OutputFormat,
}

impl Config {
  /// Load configuration from the config file and the process environment,
  /// with `output_flag` taking precedence over both
  pub fn load(output_flag: Option<OutputFormat>) -> Result<Self, ConfigError> {
    Self::load_with(|var| std::env::var(var).ok(), output_flag)
  }

  /// Load configuration using `env` to look up environment variables
  pub fn load_with(env: impl Fn(&str) -> Option<String>, output_flag: Option<OutputFormat>) -> Result<Self, ConfigError> {
    let file = match non_empty(env(ENV_CONFIG)) {
      // An explicitly named file has to exist
      Some(path) => FileConfig::read(Path::new(&path))?,
      None => match default_config_path() {
        Some(path) if path.is_file() => FileConfig::read(&path)?,
        _ => FileConfig::default(),
      },
    };

    Self::from_sources(file, env, output_flag)
  }

  /// Merge an already-parsed file with environment lookups and flags
  pub fn from_sources(
    file: FileConfig,
    env: impl Fn(&str) -> Option<String>,
    output_flag: Option<OutputFormat>,
  ) -> Result<Self, ConfigError> {
    let pick = |var: &str, file_value: Option<String>| non_empty(env(var)).or_else(|| non_empty(file_value));

    let jira_deployment = match pick(ENV_JIRA_DEPLOYMENT, file.jira_deployment) {
      Some(value) => DeploymentMode::parse(&value).ok_or(ConfigError::InvalidDeployment(value))?,
      None => DeploymentMode::default(),
    };

    let output = match output_flag {
      Some(format) => format,
      None => match pick(ENV_OUTPUT, file.output) {
        Some(value) => OutputFormat::parse(&value).ok_or(ConfigError::InvalidOutput(value))?,
        None => OutputFormat::default(),
      },
    };

    let config = Self {
      jira_token: pick(ENV_JIRA_TOKEN, file.jira_token),
      jira_base_url: pick(ENV_JIRA_BASE_URL, file.jira_base_url),
      confluence_token: pick(ENV_CONFLUENCE_TOKEN, file.confluence_token),
      confluence_base_url: pick(ENV_CONFLUENCE_BASE_URL, file.confluence_base_url),
      jira_deployment,
      output,
    };
    debug!(deployment = %config.jira_deployment, output = %config.output, "Configuration loaded");

    Ok(config)
  }

  /// Credentials for Jira, or an error naming the missing variable
  pub fn jira_credentials(&self) -> Result<Credentials, ConfigError> {
    credentials(
      self.jira_token.as_deref(),
      (ENV_JIRA_TOKEN, "jira_token"),
      self.jira_base_url.as_deref(),
      (ENV_JIRA_BASE_URL, "jira_base_url"),
    )
  }

  /// Credentials for Confluence, or an error naming the missing variable
  pub fn confluence_credentials(&self) -> Result<Credentials, ConfigError> {
    credentials(
      self.confluence_token.as_deref(),
      (ENV_CONFLUENCE_TOKEN, "confluence_token"),
      self.confluence_base_url.as_deref(),
      (ENV_CONFLUENCE_BASE_URL, "confluence_base_url"),
    )
  }
}

/// Location of `config.toml` in the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
  ProjectDirs::from("dev", "atl", "atl").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn credentials(
  token: Option<&str>,
  (token_var, token_key): (&'static str, &'static str),
  base_url: Option<&str>,
  (url_var, url_key): (&'static str, &'static str),
) -> Result<Credentials, ConfigError> {
  let token = token.ok_or(ConfigError::Missing {
    var: token_var,
    key: token_key,
  })?;
  let base_url = base_url.ok_or(ConfigError::Missing {
    var: url_var,
    key: url_key,
  })?;
  let base_url = normalize_base_url(base_url).map_err(|source| ConfigError::InvalidBaseUrl { var: url_var, source })?;

  Ok(Credentials {
    base_url,
    token: token.to_string(),
  })
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use atl_test_utils::ConfigFileGuard;

  use super::*;

  fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn test_credentials_from_env() {
    let config = Config::from_sources(
      FileConfig::default(),
      env_of(&[
        ("JIRA_TOKEN", "  secret  "),
        ("JIRA_BASE_URL", "https://jira.example.com/"),
      ]),
      None,
    )
    .unwrap();

    let creds = config.jira_credentials().unwrap();
    assert_eq!(creds.base_url, "https://jira.example.com");
    assert_eq!(creds.token, "secret");
  }

  #[test]
  fn test_missing_token_names_variable() {
    let config = Config::from_sources(
      FileConfig::default(),
      env_of(&[("JIRA_BASE_URL", "https://jira.example.com")]),
      None,
    )
    .unwrap();

    let err = config.jira_credentials().unwrap_err();
    assert!(matches!(err, ConfigError::Missing { var: "JIRA_TOKEN", .. }));
    assert!(err.to_string().contains("JIRA_TOKEN"));
  }

  #[test]
  fn test_missing_base_url_names_variable() {
    let config = Config::from_sources(
      FileConfig::default(),
      env_of(&[("CONFLUENCE_TOKEN", "secret"), ("CONFLUENCE_BASE_URL", "   ")]),
      None,
    )
    .unwrap();

    let err = config.confluence_credentials().unwrap_err();
    assert!(err.to_string().contains("CONFLUENCE_BASE_URL"));
  }

  #[test]
  fn test_invalid_base_url() {
    let config = Config::from_sources(
      FileConfig::default(),
      env_of(&[("JIRA_TOKEN", "secret"), ("JIRA_BASE_URL", "https://")]),
      None,
    )
    .unwrap();

    let err = config.jira_credentials().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { var: "JIRA_BASE_URL", .. }));
  }

  #[test]
  fn test_env_beats_file_and_flag_beats_env() {
    let file = FileConfig {
      jira_token: Some("file-token".to_string()),
      jira_base_url: Some("https://file.example.com".to_string()),
      output: Some("text".to_string()),
      ..FileConfig::default()
    };

    let config = Config::from_sources(
      file.clone(),
      env_of(&[("JIRA_TOKEN", "env-token"), ("ATL_OUTPUT", "json")]),
      None,
    )
    .unwrap();
    let creds = config.jira_credentials().unwrap();
    assert_eq!(creds.token, "env-token");
    assert_eq!(creds.base_url, "https://file.example.com");
    assert_eq!(config.output, OutputFormat::Json);

    let config = Config::from_sources(file, env_of(&[("ATL_OUTPUT", "json")]), Some(OutputFormat::Text)).unwrap();
    assert_eq!(config.output, OutputFormat::Text);
  }

  #[test]
  fn test_deployment_mode() {
    let config = Config::from_sources(FileConfig::default(), env_of(&[]), None).unwrap();
    assert_eq!(config.jira_deployment, DeploymentMode::Cloud);

    let config = Config::from_sources(FileConfig::default(), env_of(&[("JIRA_DEPLOYMENT", "Server")]), None).unwrap();
    assert_eq!(config.jira_deployment, DeploymentMode::Server);

    let err = Config::from_sources(FileConfig::default(), env_of(&[("JIRA_DEPLOYMENT", "mainframe")]), None).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDeployment(ref v) if v == "mainframe"));
  }

  #[test]
  fn test_invalid_output_from_env() {
    let err = Config::from_sources(FileConfig::default(), env_of(&[("ATL_OUTPUT", "yaml")]), None).unwrap_err();
    assert!(err.to_string().contains("yaml"));
  }

  #[test]
  fn test_load_explicit_config_file() {
    let guard = ConfigFileGuard::new(
      r#"
jira_token = "file-token"
jira_base_url = "jira.example.com/"
confluence_token = "wiki-token"
confluence_base_url = "https://wiki.example.com/confluence/"
jira_deployment = "server"
"#,
    );
    let path = guard.path().to_string_lossy().into_owned();

    let config = Config::load_with(env_of(&[("ATL_CONFIG", path.as_str())]), None).unwrap();
    assert_eq!(config.jira_deployment, DeploymentMode::Server);
    assert_eq!(config.jira_credentials().unwrap().base_url, "https://jira.example.com");
    assert_eq!(
      config.confluence_credentials().unwrap().base_url,
      "https://wiki.example.com/confluence"
    );
  }

  #[test]
  fn test_load_missing_explicit_config_file() {
    let guard = ConfigFileGuard::new("");
    let missing = guard.temp_dir.path().join("absent.toml").to_string_lossy().into_owned();

    let err = Config::load_with(env_of(&[("ATL_CONFIG", missing.as_str())]), None).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }

  #[test]
  fn test_load_malformed_config_file() {
    let guard = ConfigFileGuard::new("jira_token = ");
    let path = guard.path().to_string_lossy().into_owned();

    let err = Config::load_with(env_of(&[("ATL_CONFIG", path.as_str())]), None).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn test_credentials_debug_redacts_token() {
    let creds = Credentials {
      base_url: "https://jira.example.com".to_string(),
      token: "secret".to_string(),
    };
    assert!(!format!("{creds:?}").contains("secret"));
  }
}
