//! Configuration management
//!
//! Handles:
//! - Output defaults (format, pretty printing, colour)
//! - Collection knobs (command timeout, CPU sampling window)
//! - Process listing defaults (sort key, limit)
//!
//! Every field is optional in the file; missing ones take the defaults below.

use crate::metrics::{SortKey, DEFAULT_PROCESS_LIMIT};
use crate::output::{ColorMode, Format};
use crate::platform::ProbeSettings;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub output: OutputConfig,
    pub collection: CollectionConfig,
    pub process: ProcessConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Format,
    pub pretty: bool,
    pub color: ColorMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub command_timeout_secs: u64,
    /// 0 disables CPU usage sampling
    pub cpu_sample_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub sort: SortKey,
    pub limit: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 5,
            cpu_sample_ms: 0,
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            sort: SortKey::default(),
            limit: DEFAULT_PROCESS_LIMIT,
        }
    }
}

impl ProbeConfig {
    /// Load from `path`, or from the OS-specific location when `None`
    ///
    /// A missing file yields the defaults; an explicit path must exist.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::config_file_path() {
                Some(path) => (path, false),
                None => {
                    debug!("No config directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config {}", config_path.display()))?;

        debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: ProbeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.process.limit == 0 {
            bail!("process.limit must be at least 1");
        }
        if self.collection.command_timeout_secs == 0 {
            bail!("collection.command_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// `<config_dir>/sysprobe/config.toml`
    pub fn config_file_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("sysprobe");
        path.push("config.toml");
        Some(path)
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            command_timeout: Duration::from_secs(self.collection.command_timeout_secs),
            cpu_sample: Duration::from_millis(self.collection.cpu_sample_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.output.format, Format::Table);
        assert_eq!(config.output.color, ColorMode::Auto);
        assert!(!config.output.pretty);
        assert_eq!(config.process.sort, SortKey::Cpu);
        assert_eq!(config.process.limit, 10);
        assert_eq!(config.collection.command_timeout_secs, 5);
        assert!(config.validate().is_ok());

        let settings = config.probe_settings();
        assert_eq!(settings.command_timeout, Duration::from_secs(5));
        assert!(settings.cpu_sample.is_zero());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = ProbeConfig::parse(
            r#"
[output]
format = "json"
pretty = true

[process]
sort = "memory"
"#,
        )
        .unwrap();

        assert_eq!(config.output.format, Format::Json);
        assert!(config.output.pretty);
        assert_eq!(config.output.color, ColorMode::Auto);
        assert_eq!(config.process.sort, SortKey::Memory);
        assert_eq!(config.process.limit, 10);
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        assert!(ProbeConfig::parse("[process]\nlimit = 0\n").is_err());
        assert!(ProbeConfig::parse("[collection]\ncommand_timeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_sort() {
        assert!(ProbeConfig::parse("[process]\nsort = \"pid\"\n").is_err());
    }

    #[tokio::test]
    async fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[collection]\ncpu_sample_ms = 250\n").unwrap();

        let config = ProbeConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.collection.cpu_sample_ms, 250);
        assert_eq!(config.probe_settings().cpu_sample, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProbeConfig::load(Some(&dir.path().join("absent.toml"))).await;
        assert!(result.is_err());
    }
}
