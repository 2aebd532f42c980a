//! Configuration file handling.
//!
//! The config lives at `<config dir>/bookmarker/config.toml` (for example
//! `~/.config/bookmarker/config.toml` on Linux) unless `--config` points
//! elsewhere. It is created with defaults on first use.
//!
//! ```toml
//! account_key_file = "/home/me/.secrets/bookmarks-sa.json"
//! browser = "firefox"
//! filter_cmd = "fzf --height ${FZF_HEIGHT}"
//! # wait_for_browser = false
//! # sort_by_created_at = true
//! # collection = "bookmarks"
//! # emulator_host = "localhost:8080"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BookmarkerError;

/// Environment variable naming a Firestore emulator (`host:port`).
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the service-account JSON key used to authenticate to the store.
    #[serde(default)]
    pub account_key_file: String,
    /// Browser executable, invoked with the URL as its only argument.
    #[serde(default = "default_browser")]
    pub browser: String,
    /// Shell command of the interactive filter. `$VAR` references are expanded.
    #[serde(default = "default_filter_cmd")]
    pub filter_cmd: String,
    /// Block until the browser process exits instead of detaching it.
    #[serde(default)]
    pub wait_for_browser: bool,
    /// List bookmarks oldest first instead of in store order.
    #[serde(default = "default_true")]
    pub sort_by_created_at: bool,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Talk to a Firestore emulator at this `host:port` without authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emulator_host: Option<String>,
}

fn default_browser() -> String {
    "google-chrome".to_string()
}
fn default_filter_cmd() -> String {
    "peco".to_string()
}
fn default_true() -> bool {
    true
}
fn default_collection() -> String {
    "bookmarks".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_key_file: String::new(),
            browser: default_browser(),
            filter_cmd: default_filter_cmd(),
            wait_for_browser: false,
            sort_by_created_at: true,
            collection: default_collection(),
            emulator_host: None,
        }
    }
}

impl Config {
    /// Fill unset values from the environment (`FIRESTORE_EMULATOR_HOST`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.emulator_host.is_none() {
            self.emulator_host = lookup(EMULATOR_HOST_ENV).filter(|h| !h.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_key_file.trim().is_empty() && self.emulator_host.is_none() {
            return Err(BookmarkerError::Config(
                "please set key file to config file".to_string(),
            )
            .into());
        }
        if self.collection.trim().is_empty() {
            return Err(BookmarkerError::Config("collection must not be empty".to_string()).into());
        }
        if self.browser.trim().is_empty() {
            return Err(BookmarkerError::Config("browser must not be empty".to_string()).into());
        }
        Ok(())
    }
}

/// Default config location: `<config dir>/bookmarker/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| {
        BookmarkerError::Config("cannot determine the user config directory".to_string())
    })?;
    Ok(dir.join("bookmarker").join("config.toml"))
}

/// Write a default config to `path` if nothing exists there yet.
///
/// Returns `true` when a new file was created.
pub fn ensure_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string(&Config::default()).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    log::info!("created default config at {}", path.display());
    Ok(true)
}

/// Read, parse and validate the config at `path`, honouring environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BookmarkerError::Config(format!(
            "failed to load config {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config: Config = toml::from_str(&content).map_err(|e| {
        BookmarkerError::Config(format!("failed to parse {}: {}", path.display(), e))
    })?;

    config.apply_env(|name| std::env::var(name).ok());
    config.validate()?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// The editor for `-c`: `$EDITOR`, falling back to `vim`.
pub fn editor_from_env() -> String {
    std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vim".to_string())
}

/// Open the config in `editor`, creating a default file first if needed.
///
/// The editor string may carry arguments (`"code --wait"`); it is run
/// through `sh` with the path passed as a positional parameter.
pub fn edit_config(path: &Path, editor: &str) -> Result<()> {
    ensure_config(path)?;
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{} \"$1\"", editor))
        .arg("bookmarker")
        .arg(path)
        .status()
        .with_context(|| format!("Failed to start editor '{}'", editor))?;
    if !status.success() {
        anyhow::bail!("editor '{}' exited with {}", editor, status);
    }
    Ok(())
}
