use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_AFFILIATE_BASE: &str = "https://crypto.com/app/YOUR_CODE_HERE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_refresh")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_visible_count")]
    pub visible_count: usize,
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,
    #[serde(default = "default_affiliate_base")]
    pub affiliate_base: String,
    #[serde(default)]
    pub coingecko_api_key: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_refresh() -> u64 {
    60
}

fn default_visible_count() -> usize {
    10
}

fn default_scroll_step() -> f64 {
    350.0
}

fn default_affiliate_base() -> String {
    DEFAULT_AFFILIATE_BASE.to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh(),
            visible_count: default_visible_count(),
            scroll_step: default_scroll_step(),
            affiliate_base: default_affiliate_base(),
            coingecko_api_key: String::new(),
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Reads the config file if there is one. A missing file means defaults;
    /// nothing is ever written back.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let mut cfg: Config = serde_yaml::from_str(contents)?;
        cfg.normalize();
        Ok(cfg)
    }

    fn normalize(&mut self) {
        if self.refresh_interval_secs < 30 {
            self.refresh_interval_secs = 30;
        }
        if self.visible_count == 0 {
            self.visible_count = default_visible_count();
        }
        if !(self.scroll_step > 0.0) {
            self.scroll_step = default_scroll_step();
        }
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn config_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("coinreel");
        path
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }
}
