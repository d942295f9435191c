use std::fmt;
use std::path::PathBuf;

use crate::SteamError;

/// Environment variable that overrides Steam directory detection.
pub const STEAM_DIR_ENV: &str = "STEAM_DIR";

/// Type of cached library artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkType {
    /// Small square icon.
    Icon,
    /// 460x215 horizontal header.
    Header,
    /// 600x900 vertical capsule.
    Portrait,
    /// 1920x620 library hero.
    Hero,
    /// Transparent logo.
    Logo,
}

impl ArtworkType {
    /// Returns the file name suffix Steam uses in its library cache.
    fn suffix(&self) -> &'static str {
        match self {
            ArtworkType::Icon => "_icon.jpg",
            ArtworkType::Header => "_header.jpg",
            ArtworkType::Portrait => "_library_600x900.jpg",
            ArtworkType::Hero => "_library_hero.jpg",
            ArtworkType::Logo => "_logo.png",
        }
    }
}

impl fmt::Display for ArtworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkType::Icon => write!(f, "icon"),
            ArtworkType::Header => write!(f, "header"),
            ArtworkType::Portrait => write!(f, "portrait"),
            ArtworkType::Hero => write!(f, "hero"),
            ArtworkType::Logo => write!(f, "logo"),
        }
    }
}

/// Provides access to Steam directory paths.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance with auto-detected Steam directory.
    ///
    /// `STEAM_DIR` takes precedence over the platform locations.
    pub fn new() -> Result<Self, SteamError> {
        let base_dir = match std::env::var_os(STEAM_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => get_base_dir()?,
        };
        tracing::debug!(base_dir = %base_dir.display(), "using Steam directory");
        Ok(Self { base_dir })
    }

    /// Creates a new `Paths` instance with a custom base directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Returns the `steamapps` directory of the base library.
    pub fn steamapps_dir(&self) -> PathBuf {
        self.base_dir.join("steamapps")
    }

    /// Returns the path to libraryfolders.vdf.
    pub fn library_folders_path(&self) -> PathBuf {
        self.steamapps_dir().join("libraryfolders.vdf")
    }

    /// Returns the path to loginusers.vdf.
    pub fn login_users_path(&self) -> PathBuf {
        self.base_dir.join("config").join("loginusers.vdf")
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific account ID.
    pub fn user_dir(&self, account_id: u32) -> PathBuf {
        self.user_data_dir().join(account_id.to_string())
    }

    /// Returns the directory where Steam caches library artwork.
    pub fn library_cache_dir(&self) -> PathBuf {
        self.base_dir.join("appcache").join("librarycache")
    }

    /// Returns the cache path for a specific artwork type.
    pub fn artwork_path(&self, app_id: u32, art_type: ArtworkType) -> PathBuf {
        self.library_cache_dir()
            .join(artwork_filename(app_id, art_type))
    }

    /// Returns the cached artwork path only if the file exists.
    pub fn cached_artwork(&self, app_id: u32, art_type: ArtworkType) -> Option<PathBuf> {
        let path = self.artwork_path(app_id, art_type);
        path.exists().then_some(path)
    }
}

/// Generates the library cache file name for artwork.
fn artwork_filename(app_id: u32, art_type: ArtworkType) -> String {
    format!("{}{}", app_id, art_type.suffix())
}

// Platform-specific base directory detection.
#[cfg(target_os = "linux")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_linux::get_base_dir()
}

#[cfg(target_os = "windows")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_windows::get_base_dir()
}

#[cfg(target_os = "macos")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    let home = std::env::var_os("HOME").ok_or(SteamError::NotFound)?;
    let steam_dir = PathBuf::from(home)
        .join("Library")
        .join("Application Support")
        .join("Steam");
    if steam_dir.exists() {
        Ok(steam_dir)
    } else {
        Err(SteamError::NotFound)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    Err(SteamError::NotFound)
}
