//! Scanner configuration.
//!
//! Configuration is stored as TOML:
//! - Linux/macOS: `~/.config/gami/steam-scan.toml`
//! - Windows: `%APPDATA%/gami/steam-scan.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use gami_steam::{Paths, SteamError};
use gami_vdf::DecodeOptions;
use serde::{Deserialize, Serialize};

/// Scanner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Steam base directory; auto-detected when unset.
    #[serde(default)]
    pub steam_dir: Option<PathBuf>,

    /// Scan every folder listed in libraryfolders.vdf, not just the base library.
    #[serde(default = "default_true")]
    pub include_library_folders: bool,

    /// Decoder policies for every Valve file read.
    #[serde(default)]
    pub decoder: DecodeOptions,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_dir: None,
            include_library_folders: default_true(),
            decoder: DecodeOptions::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Resolves Steam paths; `override_dir` beats the configured directory.
    pub fn paths(&self, override_dir: Option<&Path>) -> Result<Paths, SteamError> {
        match override_dir.or(self.steam_dir.as_deref()) {
            Some(dir) => Ok(Paths::with_base(dir)),
            None => Paths::new(),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("gami").join("steam-scan.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("gami")
            .join("steam-scan.toml")
    }
}
