//! Configuration file support for Rigging.
//!
//! Rigging supports two configuration file locations:
//! - Global: `~/.rigging/config.toml` - User-wide defaults
//! - Project: `.rigging/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::emit::EmitFormat;

/// Rigging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution settings
    pub resolve: ResolveConfig,

    /// Output settings
    pub emit: EmitConfig,
}

/// Resolution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Worker threads for resolving (project, target) pairs
    pub jobs: Option<usize>,
}

/// Output settings for `rigging generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Output format (json, summary)
    pub format: Option<String>,

    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.resolve.jobs.is_some() {
            self.resolve.jobs = other.resolve.jobs;
        }
        if other.emit.format.is_some() {
            self.emit.format = other.emit.format;
        }
        if other.emit.output.is_some() {
            self.emit.output = other.emit.output;
        }
    }

    /// Configured output format, if it names a known one.
    pub fn format(&self) -> Option<EmitFormat> {
        let name = self.emit.format.as_ref()?;
        match name.parse() {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::warn!("ignoring configured format: {}", e);
                None
            }
        }
    }
}

/// Load configuration from the global and project locations.
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// `~/.rigging`, if a home directory can be determined.
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".rigging"))
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".rigging").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.resolve.jobs.is_none());
        assert!(config.format().is_none());
        assert!(config.emit.output.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[resolve]
jobs = 8

[emit]
format = "summary"
output = "build/configs.txt"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.resolve.jobs, Some(8));
        assert_eq!(config.format(), Some(EmitFormat::Summary));
        assert_eq!(config.emit.output, Some(PathBuf::from("build/configs.txt")));
    }

    #[test]
    fn test_project_config_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(&global, "[resolve]\njobs = 4\n[emit]\nformat = \"summary\"\n").unwrap();
        std::fs::write(&project, "[emit]\nformat = \"json\"\n").unwrap();

        let config = load_config(&global, &project);
        assert_eq!(config.resolve.jobs, Some(4));
        assert_eq!(config.format(), Some(EmitFormat::Json));
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[resolve\njobs = ").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.resolve.jobs.is_none());
    }

    #[test]
    fn test_unknown_format_is_ignored() {
        let mut config = Config::default();
        config.emit.format = Some("vcxproj".to_string());
        assert!(config.format().is_none());
    }
}
