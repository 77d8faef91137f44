// SPDX-License-Identifier: MIT OR Apache-2.0

use abalone_core::SessionConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bridge::BridgeTimeouts;
use crate::driver::DriverSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// `host:port` of the AI service
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_max_ai_failures")]
    pub max_ai_failures: u32,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_server() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_max_ai_failures() -> u32 {
    3
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ai_failures: default_max_ai_failures(),
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn timeouts(&self) -> BridgeTimeouts {
        BridgeTimeouts {
            connect: Duration::from_millis(self.connect_timeout_ms),
            request: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            // A zero interval would make the tick schedule spin
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            max_ai_failures: self.max_ai_failures.max(1),
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "abalone", "abalone").context("Failed to determine config directory")?;

    // On macOS, use Application Support directory
    let config_dir = if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        PathBuf::from(home).join("Library/Application Support/abalone")
    } else {
        proj_dirs.config_dir().to_path_buf()
    };

    Ok(config_dir.join("config.toml"))
}

pub fn load_config() -> Result<ClientConfig> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    load_config_from(&config_path)
}

/// Load the config at `path`, writing the defaults there if it does not exist
pub fn load_config_from(config_path: &Path) -> Result<ClientConfig> {
    if !config_path.exists() {
        tracing::info!("Config file not found, creating default at: {}", config_path.display());

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = ClientConfig::default();
        save_config_to(&default_config, config_path)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    toml::from_str::<ClientConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

pub fn save_config(config: &ClientConfig) -> Result<()> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    save_config_to(config, &config_path)
}

pub fn save_config_to(config: &ClientConfig, config_path: &Path) -> Result<()> {
    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(config_path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::info!("Saved config to: {}", config_path.display());
    Ok(())
}
