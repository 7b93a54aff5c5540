use crate::validate::FieldError;
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_endpoint() -> String {
    "https://jsonplaceholder.typicode.com/users".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Remote read endpoint returning the JSON user array.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout for the fetch, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Session transcripts directory; defaults to .roster/sessions.
    #[serde(default)]
    pub transcripts_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            transcripts_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from default paths.
    /// Priority: project (.roster/config.toml) > user (~/.roster/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".roster").join("config.toml");
            if user_config.exists() {
                let user = Self::load_from(&user_config)?;
                config.merge(user);
            }
        }

        let project_config = Path::new(".roster").join("config.toml");
        if project_config.exists() {
            let project = Self::load_from(&project_config)?;
            config.merge(project);
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority).
    /// Fields still at their default are treated as unset.
    pub fn merge(&mut self, other: Config) {
        if other.endpoint != default_endpoint() {
            self.endpoint = other.endpoint;
        }
        if other.timeout_secs != default_timeout_secs() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.transcripts_dir.is_some() {
            self.transcripts_dir = other.transcripts_dir;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            errors.push(FieldError {
                field: "endpoint".to_string(),
                message: format!("Must be an http(s) URL, got '{}'", self.endpoint),
            });
        }

        if self.timeout_secs == 0 {
            errors.push(FieldError {
                field: "timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, "https://jsonplaceholder.typicode.com/users");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.transcripts_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 30\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timeout_secs, 30);
        // Unset fields keep their defaults.
        assert_eq!(config.endpoint, "https://jsonplaceholder.typicode.com/users");
    }

    #[test]
    fn test_merge_other_takes_priority() {
        let mut base = Config {
            endpoint: "https://staging.example.com/users".to_string(),
            ..Config::default()
        };
        let other = Config {
            timeout_secs: 5,
            ..Config::default()
        };
        base.merge(other);
        // other's default endpoint does not clobber the configured one.
        assert_eq!(base.endpoint, "https://staging.example.com/users");
        assert_eq!(base.timeout_secs, 5);
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let config = Config {
            endpoint: "ftp://example.com/users".to_string(),
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "endpoint");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("timeout"));
    }
}
