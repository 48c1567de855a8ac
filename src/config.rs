//! Configuration file for the explorer
//!
//! TOML, read from `~/.config/hid-explorer/config.toml` unless `--config`
//! points elsewhere. Every field is optional:
//!
//! ```toml
//! log_level = "info"
//!
//! [[filters]]
//! vendor_id = 0x046D
//!
//! [[filters]]
//! usage_page = 0xFF00
//!
//! [monitor]
//! max_reports = 100
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use hid_explorer_core::DeviceFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "ExplorerConfig::default_log_level")]
    pub log_level: String,
    /// Grant filters used when none are given on the command line
    #[serde(default)]
    pub filters: Vec<DeviceFilter>,
    #[serde(default)]
    pub monitor: MonitorSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Stop monitoring after this many reports
    #[serde(default)]
    pub max_reports: Option<usize>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            filters: Vec::new(),
            monitor: MonitorSettings::default(),
        }
    }
}

impl ExplorerConfig {
    fn default_log_level() -> String {
        "warn".to_string()
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hid-explorer")
            .join("config.toml")
    }

    /// Load config from a file, or return defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Command-line filter wins over configured filters when it sets anything
    pub fn effective_filters(&self, cli_filter: &DeviceFilter) -> Vec<DeviceFilter> {
        if *cli_filter != DeviceFilter::default() {
            vec![cli_filter.clone()]
        } else {
            self.filters.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ExplorerConfig::from_toml("").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_full_config() {
        let config = ExplorerConfig::from_toml(
            r#"
log_level = "debug"

[[filters]]
vendor_id = 0x046D
product_id = 0xC077

[[filters]]
usage_page = 0xFF00

[monitor]
max_reports = 5
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.filters[0].vendor_id, Some(0x046D));
        assert_eq!(config.filters[0].product_id, Some(0xC077));
        assert_eq!(config.filters[1].usage_page, Some(0xFF00));
        assert_eq!(config.monitor.max_reports, Some(5));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(ExplorerConfig::from_toml("filters = 3").is_err());
    }

    #[test]
    fn test_cli_filter_overrides_configured() {
        let config = ExplorerConfig {
            filters: vec![DeviceFilter {
                vendor_id: Some(1),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(config.effective_filters(&DeviceFilter::default()), config.filters);

        let cli = DeviceFilter {
            usage_page: Some(0x000C),
            ..Default::default()
        };
        assert_eq!(config.effective_filters(&cli), vec![cli]);
    }
}
