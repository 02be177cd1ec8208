//! Configuration file handling.
//!
//! This module provides loading and saving of dustilock configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/dustilock/config.toml`
//! - macOS: `~/Library/Application Support/dustilock/config.toml`
//! - Windows: `%APPDATA%\dustilock\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! excluded_directories = [".git", "node_modules", ".venv"]
//! concurrency = 4
//! default_format = "text"
//!
//! [registry]
//! npm_url = "https://registry.npmjs.org"
//! pypi_url = "https://pypi.org"
//! timeout_secs = 30
//!
//! [ignore]
//! packages = ["left-pad", "acme-*"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names never descended into during a recursive scan.
pub const DEFAULT_EXCLUDED_DIRECTORIES: [&str; 2] = [".git", "node_modules"];

/// Application configuration.
///
/// This struct represents all configurable options for dustilock.
/// It can be loaded from a TOML file or created with default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory names pruned from recursive scans, matched by name at any depth.
    ///
    /// Default: `.git`, `node_modules`
    pub excluded_directories: Vec<String>,

    /// How many registry queries may be in flight at once for one manifest.
    ///
    /// Default: 1 (one query at a time)
    pub concurrency: usize,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub default_format: String,

    /// Public registry endpoints.
    pub registry: RegistryConfig,

    /// Packages whose availability is never checked.
    pub ignore: IgnoreConfig,
}

/// Registry endpoints and HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the npm registry; packages live at `{npm_url}/{name}`.
    pub npm_url: String,

    /// Base URL of the Python index; projects live at `{pypi_url}/pypi/{name}/json`.
    pub pypi_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            npm_url: "https://registry.npmjs.org".to_string(),
            pypi_url: "https://pypi.org".to_string(),
            timeout_secs: 30,
            user_agent: concat!("dustilock/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Configuration for skipping specific packages.
///
/// Use this for names that are known to be safe, e.g. resolved only
/// through a pinned private index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names to skip. Supports glob patterns (e.g. "acme-*").
    ///
    /// Matching is case-insensitive.
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.packages.iter().any(|pattern| {
            let pattern = pattern.to_lowercase();
            if pattern.contains('*') {
                glob_match(&pattern, &name)
            } else {
                pattern == name
            }
        })
    }
}

/// Matches `text` against a pattern where each `*` stands for any run of
/// characters, including none.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let head = parts.next().unwrap_or_default();
    let Some(rest) = text.strip_prefix(head) else {
        return false;
    };

    let mut middle: Vec<&str> = parts.collect();
    let Some(tail) = middle.pop() else {
        return rest.is_empty();
    };
    let Some(mut rest) = rest.strip_suffix(tail) else {
        return false;
    };

    for part in middle.into_iter().filter(|part| !part.is_empty()) {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_directories: DEFAULT_EXCLUDED_DIRECTORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            concurrency: 1,
            default_format: "text".to_string(),
            registry: RegistryConfig::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Loads configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the default config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dustilock")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// The exclusion set as consulted by recursive scans.
    pub fn exclusion_set(&self) -> BTreeSet<String> {
        self.excluded_directories.iter().cloned().collect()
    }

    /// Concurrency clamped to at least one query.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match_exact() {
        assert!(glob_match("left-pad", "left-pad"));
        assert!(!glob_match("left-pad", "right-pad"));
    }

    #[test]
    fn test_glob_match_prefix() {
        assert!(glob_match("acme-*", "acme-"));
        assert!(glob_match("acme-*", "acme-billing"));
        assert!(!glob_match("acme-*", "not-acme"));
    }

    #[test]
    fn test_glob_match_suffix() {
        assert!(glob_match("*-internal", "auth-internal"));
        assert!(!glob_match("*-internal", "internal-auth"));
    }

    #[test]
    fn test_glob_match_contains() {
        assert!(glob_match("*corp*", "corp"));
        assert!(glob_match("*corp*", "my-corp-utils"));
        assert!(!glob_match("*corp*", "company"));
    }

    #[test]
    fn test_glob_match_middle_wildcard() {
        assert!(glob_match("acme-*-svc", "acme-billing-svc"));
        assert!(glob_match("acme-*-svc", "acme--svc"));
        assert!(!glob_match("acme-*-svc", "acme-svc"));
        assert!(!glob_match("acme-*-svc", "acme-billing-api"));

        let ignore = IgnoreConfig {
            packages: vec!["acme-*-svc".to_string()],
        };
        assert!(ignore.should_ignore_package("Acme-Ledger-Svc"));
        assert!(!ignore.should_ignore_package("acme-ledger"));
    }

    #[test]
    fn test_ignore_config_is_case_insensitive() {
        let config = IgnoreConfig {
            packages: vec!["Left-Pad".to_string(), "acme-*".to_string()],
        };

        assert!(config.should_ignore_package("left-pad"));
        assert!(config.should_ignore_package("ACME-billing"));
        assert!(!config.should_ignore_package("lodash"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.excluded_directories, vec![".git", "node_modules"]);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.default_format, "text");
        assert_eq!(config.registry.npm_url, "https://registry.npmjs.org");
        assert_eq!(config.registry.pypi_url, "https://pypi.org");
        assert!(config.ignore.packages.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            concurrency = 8

            [registry]
            npm_url = "https://npm.mirror.local"
            "#,
        )
        .unwrap();

        assert_eq!(config.concurrency, 8);
        assert_eq!(config.registry.npm_url, "https://npm.mirror.local");
        assert_eq!(config.registry.pypi_url, "https://pypi.org");
        assert_eq!(config.excluded_directories.len(), 2);
    }

    #[test]
    fn test_effective_concurrency_is_at_least_one() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert_eq!(config.effective_concurrency(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "excluded_directories = [\"vendor\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.exclusion_set().contains("vendor"));
        assert!(!config.exclusion_set().contains(".git"));
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "concurrency = \"many\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = Config::generate_default_config();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.excluded_directories, Config::default().excluded_directories);
    }
}
