//! Configuration loading for usage ranking.
//!
//! Settings come from, in increasing precedence: built-in defaults, a YAML
//! config file, `COMMIT_USAGE_*` environment variables, and CLI flags.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::parser::ParserOptions;

/// Name of the per-repository config file.
pub const CONFIG_FILE_NAME: &str = ".commit-usage.yaml";

/// Default number of concurrent commit enrichments.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Commit types offered when none are configured.
pub const DEFAULT_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// Environment variable overriding the branch to walk.
pub const BRANCH_ENV: &str = "COMMIT_USAGE_BRANCH";

/// Environment variable overriding the enrichment concurrency.
pub const CONCURRENCY_ENV: &str = "COMMIT_USAGE_CONCURRENCY";

/// Usage ranking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Repository location. Defaults to the process working directory.
    pub cwd: Option<PathBuf>,

    /// Branch whose history is walked. Defaults to master, then main, then HEAD.
    pub branch: Option<String>,

    /// Maximum number of commits enriched at once.
    pub concurrency: usize,

    /// Candidate commit types for type ranking.
    pub types: Vec<String>,

    /// Options passed through to the commit parser.
    pub parser: ParserOptions,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            cwd: None,
            branch: None,
            concurrency: DEFAULT_CONCURRENCY,
            types: DEFAULT_TYPES.iter().map(|t| (*t).to_string()).collect(),
            parser: ParserOptions::default(),
        }
    }
}

impl UsageConfig {
    /// Returns a default configuration rooted at `cwd`.
    pub fn at(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            ..Self::default()
        }
    }

    /// Resolves the repository location to an absolute path.
    pub fn repository_path(&self) -> Result<PathBuf, LogError> {
        let current = env::current_dir().map_err(|e| LogError::RepositoryOpen {
            path: self.cwd.clone().unwrap_or_else(|| PathBuf::from(".")),
            message: e.to_string(),
        })?;

        Ok(match &self.cwd {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => current.join(path),
            None => current,
        })
    }

    /// Applies `COMMIT_USAGE_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(branch) = lookup(BRANCH_ENV).filter(|b| !b.is_empty()) {
            self.branch = Some(branch);
        }

        if let Some(value) = lookup(CONCURRENCY_ENV) {
            self.concurrency = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {CONCURRENCY_ENV} value: {value}"))?;
        }

        Ok(())
    }

    /// Checks option values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("Concurrency must be at least 1");
        }
        Ok(())
    }
}

/// Locates and loads the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Creates a manager that discovers the config file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager that reads an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Returns the global config path (~/.commit-usage/config.yaml).
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".commit-usage").join("config.yaml"))
    }

    /// Loads the configuration for a repository at `cwd`.
    ///
    /// An explicit path must exist. Otherwise the repository's
    /// `.commit-usage.yaml` is used, then the global file, then defaults.
    pub fn load(&self, cwd: &Path) -> Result<UsageConfig> {
        if let Some(path) = &self.config_path {
            return Self::load_from_path(path);
        }

        let candidates = [Some(cwd.join(CONFIG_FILE_NAME)), Self::global_config_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::load_from_path(&path);
            }
        }

        Ok(UsageConfig::default())
    }

    /// Loads configuration from a specific file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<UsageConfig> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: UsageConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }
}
