//! Service configuration.
//!
//! Precedence: CLI flags > environment > config file > defaults. CLI flags are
//! applied by the binary on top of [`AppConfig::load`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::DirectoryError;
use crate::listing::PageLimits;

pub const CONFIG_FILE_NAME: &str = "restaurant-directory.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON array or NDJSON seed file; the store starts empty when unset.
    pub data_path: Option<PathBuf>,
    /// Category table (TOML); the built-in table is used when unset.
    pub categories_path: Option<PathBuf>,
    pub cors_origin: String,
    pub default_limit: usize,
    pub max_limit: usize,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    /// Rolled log files kept per appender.
    pub log_retention: usize,
    /// log4rs YAML file; replaces the programmatic setup entirely.
    pub log_config: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_path: None,
            categories_path: None,
            cors_origin: "http://localhost:5173".to_string(),
            default_limit: 20,
            max_limit: 100,
            log_dir: None,
            log_level: "info".to_string(),
            log_retention: 7,
            log_config: None,
        }
    }
}

impl AppConfig {
    /// Loads the first config file found, then applies environment overrides
    /// read through `env`.
    ///
    /// # Errors
    /// Returns `Config` if an explicitly requested file is missing, a file does
    /// not parse, an env value is malformed, or the limits are inconsistent.
    pub fn load<F>(cli_config: Option<&Path>, env: F) -> Result<Self, DirectoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = cli_config {
            if !p.exists() {
                return Err(DirectoryError::Config(format!("{} does not exist", p.display())));
            }
        }
        let mut cfg = match find_config_path(cli_config, &env) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(&env)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads using the process environment.
    ///
    /// # Errors
    /// See [`AppConfig::load`].
    pub fn load_from_process(cli_config: Option<&Path>) -> Result<Self, DirectoryError> {
        Self::load(cli_config, |k| std::env::var(k).ok())
    }

    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, DirectoryError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Io(format!("{}: {e}", path.display())))?;
        let cfg: Self = toml::from_str(&s)?;
        log::debug!("config loaded from {}", path.display());
        Ok(cfg)
    }

    fn apply_env<F>(&mut self, env: &F) -> Result<(), DirectoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(s) = env("HOST") {
            self.host = s;
        }
        if let Some(s) = env("PORT") {
            self.port = s
                .trim()
                .parse()
                .map_err(|_| DirectoryError::Config(format!("PORT is not a valid port: `{s}`")))?;
        }
        if let Some(s) = env("RESTAURANTS_DATA") {
            self.data_path = Some(PathBuf::from(s));
        }
        if let Some(s) = env("RESTAURANTS_CATEGORIES") {
            self.categories_path = Some(PathBuf::from(s));
        }
        if let Some(s) = env("CORS_ORIGIN") {
            self.cors_origin = s;
        }
        if let Some(s) = env("RESTAURANTS_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(s));
        }
        if let Some(s) = env("RESTAURANTS_LOG_LEVEL") {
            self.log_level = s;
        }
        if let Some(s) = env("RESTAURANTS_LOG_RETENTION") {
            self.log_retention = s.trim().parse().map_err(|_| {
                DirectoryError::Config(format!("RESTAURANTS_LOG_RETENTION is not a count: `{s}`"))
            })?;
        }
        if let Some(s) = env("RESTAURANTS_LOG_CONFIG") {
            self.log_config = Some(PathBuf::from(s));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `Config` when `max_limit` is 0 or `default_limit` is outside `1..=max_limit`.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.max_limit == 0 {
            return Err(DirectoryError::Config("max_limit must be at least 1".into()));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(DirectoryError::Config(format!(
                "default_limit must be between 1 and max_limit ({})",
                self.max_limit
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn page_limits(&self) -> PageLimits {
        PageLimits { default_limit: self.default_limit, max_limit: self.max_limit }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn find_config_path<F>(cli_config: Option<&Path>, env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = cli_config {
        paths.push(p.to_path_buf());
    }
    if let Some(p) = env("RESTAURANTS_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join(CONFIG_FILE_NAME));
    }
    paths.into_iter().find(|p| p.is_file())
}
