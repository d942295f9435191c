//! Steam integration for gami.
//!
//! Locates the local Steam installation, enumerates its library folders and
//! maps the `appmanifest_*.acf` files found there into install records. All
//! Valve text files are decoded with `gami-vdf`.

pub mod commands;
pub mod library;
pub mod manifest;
pub mod paths;
#[cfg(target_os = "linux")]
mod paths_linux;
#[cfg(target_os = "windows")]
mod paths_windows;
pub mod scanner;
pub mod users;

use std::fs;
use std::path::{Path, PathBuf};

use gami_vdf::{Block, DecodeOptions};

// Re-export primary types.
pub use commands::{SteamCommand, command_url};
pub use library::library_folders;
pub use manifest::{AppManifest, InstallStatus, load_app_manifest};
pub use paths::{ArtworkType, Paths};
pub use scanner::{InstallRecord, ScanReport, SkippedManifest, scan_all, scan_library};
pub use users::{LoginUser, login_users, most_recent_user};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("VDF parse error in {}: {source}", .path.display())]
    Vdf {
        path: PathBuf,
        source: gami_vdf::Error,
    },

    #[error("invalid app manifest: {0}")]
    Manifest(String),
}

/// Reads a Valve text file.
///
/// Files that are not valid UTF-8 are decoded lossily; Steam writes some
/// persona names in the system code page.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "file is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Reads and decodes a Valve text file.
pub fn load_vdf(path: &Path, options: &DecodeOptions) -> Result<Block, SteamError> {
    let text = read_text(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(format!("failed to read {}: {e}", path.display()))
        }
    })?;

    gami_vdf::decode_with(&text, options).map_err(|source| SteamError::Vdf {
        path: path.to_path_buf(),
        source,
    })
}
