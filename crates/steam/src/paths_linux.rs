use std::path::PathBuf;

use crate::SteamError;

/// Returns the Steam base directory on Linux.
///
/// A candidate counts only if it has a `steamapps` directory; stale
/// `~/.steam/steam` symlinks are common after reinstalling.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    let home = home_dir()?;

    candidates(&home)
        .into_iter()
        .find(|dir| dir.join("steamapps").is_dir())
        .ok_or(SteamError::NotFound)
}

fn candidates(home: &std::path::Path) -> Vec<PathBuf> {
    vec![
        // Primary location: ~/.steam/steam
        home.join(".steam").join("steam"),
        // Debian/Ubuntu package
        home.join(".steam").join("debian-installation"),
        // Fallback: ~/.local/share/Steam
        home.join(".local").join("share").join("Steam"),
        // Flatpak location
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ]
}

fn home_dir() -> Result<PathBuf, SteamError> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(SteamError::NotFound)
}
