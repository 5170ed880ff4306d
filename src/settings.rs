use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::poller::DEFAULT_INTERVAL;

const APP_SENTINEL: &str = "ffeed";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_FEED: &str = "/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    /// `dark`, `light`, or a built-in theme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            base_url: None,
            feed: None,
            poll_interval_secs: None,
            theme: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.poll_interval_secs == Some(0) {
            bail!("poll_interval_secs must be at least 1");
        }
        Ok(())
    }

    /// Folds command-line flags over the file values. Used by `config init`.
    pub fn merged_with(&self, cli: &Cli) -> Self {
        Self {
            app: self.app.clone(),
            base_url: cli.base_url.clone().or_else(|| self.base_url.clone()),
            feed: cli.feed.clone().or_else(|| self.feed.clone()),
            poll_interval_secs: cli.interval.or(self.poll_interval_secs),
            theme: cli_theme(cli).or_else(|| self.theme.clone()),
        }
    }
}

/// Effective run configuration: flags, then settings file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub feed_path: String,
    pub interval: Duration,
    pub theme: Option<String>,
}

impl Config {
    pub fn resolve(cli: &Cli, settings: &Settings) -> Self {
        let merged = settings.merged_with(cli);
        Self {
            base_url: merged
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            feed_path: merged.feed.unwrap_or_else(|| DEFAULT_FEED.to_string()),
            interval: merged
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_INTERVAL),
            theme: merged.theme,
        }
    }
}

fn cli_theme(cli: &Cli) -> Option<String> {
    if cli.dark {
        Some("dark".to_string())
    } else if cli.light {
        Some("light".to_string())
    } else {
        cli.theme.clone()
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("ffeed")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join("ffeed.log")
}
