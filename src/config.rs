//! Configuration Management
//!
//! Optional settings file for tagscan. Command line flags win over the file,
//! the file wins over built-in defaults.

use crate::aws::regions::{list_regions, validate_region};
use crate::report::ReportFormat;
use crate::resource::{Throttle, DEFAULT_PAGE_SIZE, DEFAULT_TICK_INTERVAL};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Regions to scan instead of the built-in list
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    /// GetResources page size (1-100)
    #[serde(default)]
    pub page_size: Option<i32>,
    /// Pages fetched back to back before pausing (0 disables pausing)
    #[serde(default)]
    pub throttle_burst: Option<usize>,
    /// Length of the pause, in seconds
    #[serde(default)]
    pub throttle_pause_secs: Option<u64>,
    /// Progress heartbeat, in milliseconds
    #[serde(default)]
    pub tick_millis: Option<u64>,
    /// Named AWS profile
    #[serde(default)]
    pub profile: Option<String>,
    /// Report layout
    #[serde(default)]
    pub format: Option<ReportFormat>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tagscan").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`; a missing or broken file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(err) => {
                tracing::warn!("Could not read config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Get effective regions (CLI > config > built-in list)
    pub fn effective_regions(&self, cli: &[String]) -> Result<Vec<String>> {
        let regions = if !cli.is_empty() {
            cli.to_vec()
        } else if let Some(regions) = self.regions.as_ref().filter(|r| !r.is_empty()) {
            regions.clone()
        } else {
            list_regions()
        };

        let invalid: Vec<&str> = regions
            .iter()
            .map(String::as_str)
            .filter(|region| !validate_region(region))
            .collect();
        if !invalid.is_empty() {
            bail!("Invalid region name(s): {}", invalid.join(", "));
        }

        Ok(regions)
    }

    /// Get effective page size (CLI > config > 100), clamped to what the API accepts
    pub fn effective_page_size(&self, cli: Option<i32>) -> i32 {
        cli.or(self.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, DEFAULT_PAGE_SIZE)
    }

    pub fn effective_profile(&self, cli: Option<String>) -> Option<String> {
        cli.or_else(|| self.profile.clone())
    }

    pub fn effective_format(&self, cli: Option<ReportFormat>) -> ReportFormat {
        cli.or(self.format).unwrap_or_default()
    }

    pub fn throttle(&self) -> Throttle {
        let default = Throttle::default();
        Throttle::new(
            self.throttle_burst.unwrap_or(default.burst),
            self.throttle_pause_secs
                .map(Duration::from_secs)
                .unwrap_or(default.pause),
        )
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_millis
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TICK_INTERVAL)
    }
}
