//! Client configuration
//!
//! Values are resolved from command-line flags and environment variables
//! (both handled by clap), then an optional YAML file, then defaults.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000/";
pub const SERVER_URL_ENV: &str = "DOCKET_SERVER_URL";
pub const TIMEOUT_ENV: &str = "DOCKET_TIMEOUT_SECS";

/// Configuration for the classification service client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Base URL of the service, always ending in `/`
  pub base_url: Url,
  /// Per-request timeout. `None` waits for the service indefinitely.
  pub timeout: Option<Duration>,
}

impl ClientConfig {
  pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self> {
    Ok(Self { base_url: normalize_base_url(base_url)?, timeout: timeout_from_secs(timeout_secs) })
  }

  /// Merge explicit values (flags or env) over file settings over defaults
  pub fn resolve(
    server_url: Option<&str>,
    timeout_secs: Option<u64>,
    file: &FileSettings,
  ) -> Result<Self> {
    let base_url = server_url.or(file.server_url.as_deref()).unwrap_or(DEFAULT_SERVER_URL);
    let timeout_secs = timeout_secs.or(file.timeout_secs);
    Self::new(base_url, timeout_secs)
  }
}

/// Settings read from `config.yaml`
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSettings {
  #[serde(default)]
  pub server_url: Option<String>,
  #[serde(default)]
  pub timeout_secs: Option<u64>,
}

impl FileSettings {
  /// Load settings from a YAML file. A missing file yields empty settings.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file {}", path.display()))?;
    if content.trim().is_empty() {
      return Ok(Self::default());
    }

    serde_yaml::from_str(&content)
      .with_context(|| format!("Failed to parse config file {}", path.display()))
  }

  /// Load from the explicit path if given, otherwise the per-user default location
  pub fn load_from(path: Option<&Path>) -> Result<Self> {
    match path {
      Some(path) => Self::load(path),
      None => match default_config_path() {
        Some(path) => Self::load(&path),
        None => Ok(Self::default()),
      },
    }
  }
}

/// `<config dir>/docket/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("docket").join("config.yaml"))
}

/// Parse a base URL and make sure relative endpoint paths join beneath it
pub fn normalize_base_url(raw: &str) -> Result<Url> {
  let trimmed = raw.trim();
  let mut url = Url::parse(trimmed).map_err(|e| anyhow!("Invalid server URL '{trimmed}': {e}"))?;

  if !matches!(url.scheme(), "http" | "https") {
    return Err(anyhow!("Unsupported URL scheme '{}' in '{trimmed}'", url.scheme()));
  }

  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }

  Ok(url)
}

fn timeout_from_secs(secs: Option<u64>) -> Option<Duration> {
  secs.filter(|s| *s > 0).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_default_config() {
    let config = ClientConfig::resolve(None, None, &FileSettings::default()).unwrap();
    assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
    assert!(config.timeout.is_none());
  }

  #[test]
  fn test_normalize_adds_trailing_slash() {
    let url = normalize_base_url("http://classifier.internal:8080/api").unwrap();
    assert_eq!(url.as_str(), "http://classifier.internal:8080/api/");
    assert_eq!(url.join("analyze").unwrap().as_str(), "http://classifier.internal:8080/api/analyze");
  }

  #[test]
  fn test_normalize_rejects_garbage() {
    assert!(normalize_base_url("not a url").is_err());
    assert!(normalize_base_url("ftp://example.com").is_err());
  }

  #[test]
  fn test_resolve_precedence() {
    let file = FileSettings {
      server_url: Some("http://from-file:5000".to_string()),
      timeout_secs: Some(10),
    };

    let explicit = ClientConfig::resolve(Some("http://from-flag:5000"), None, &file).unwrap();
    assert_eq!(explicit.base_url.as_str(), "http://from-flag:5000/");
    assert_eq!(explicit.timeout, Some(Duration::from_secs(10)));

    let from_file = ClientConfig::resolve(None, Some(3), &file).unwrap();
    assert_eq!(from_file.base_url.as_str(), "http://from-file:5000/");
    assert_eq!(from_file.timeout, Some(Duration::from_secs(3)));

    let defaults = ClientConfig::resolve(None, None, &FileSettings::default()).unwrap();
    assert_eq!(defaults, ClientConfig::new(DEFAULT_SERVER_URL, None).unwrap());
  }

  #[test]
  fn test_zero_timeout_means_none() {
    let config = ClientConfig::new("http://localhost:5000", Some(0)).unwrap();
    assert!(config.timeout.is_none());
  }

  #[test]
  fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "server_url: http://10.0.0.5:5000\ntimeout_secs: 45\n").unwrap();

    let settings = FileSettings::load(&path).unwrap();
    assert_eq!(settings.server_url.as_deref(), Some("http://10.0.0.5:5000"));
    assert_eq!(settings.timeout_secs, Some(45));
  }

  #[test]
  fn test_load_missing_or_empty_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");
    assert_eq!(FileSettings::load(&missing).unwrap(), FileSettings::default());

    let empty = dir.path().join("empty.yaml");
    std::fs::write(&empty, "\n").unwrap();
    assert_eq!(FileSettings::load(&empty).unwrap(), FileSettings::default());
  }

  #[test]
  fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();
    assert!(FileSettings::load(&path).is_err());
  }
}
