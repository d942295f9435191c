use std::path::PathBuf;

use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

use crate::SteamError;

/// Registry values that may hold the Steam directory, in lookup order.
fn registry_candidates() -> [(RegKey, &'static str, &'static str); 3] {
    [
        // Written by the client for the current user.
        (
            RegKey::predef(HKEY_CURRENT_USER),
            r"Software\Valve\Steam",
            "SteamPath",
        ),
        // Written by the installer; 32-bit view on 64-bit Windows.
        (
            RegKey::predef(HKEY_LOCAL_MACHINE),
            r"SOFTWARE\Wow6432Node\Valve\Steam",
            "InstallPath",
        ),
        (
            RegKey::predef(HKEY_LOCAL_MACHINE),
            r"SOFTWARE\Valve\Steam",
            "InstallPath",
        ),
    ]
}

/// Default install location when the registry has no usable entry.
const DEFAULT_STEAM_DIR: &str = r"C:\Program Files (x86)\Steam";

/// Returns the Steam base directory on Windows.
///
/// Registry entries are checked first, then the default install location.
/// A candidate counts only if it has a `steamapps` directory.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    registry_candidates()
        .into_iter()
        .filter_map(|(root, subkey, value)| registry_path(&root, subkey, value))
        .chain(std::iter::once(PathBuf::from(DEFAULT_STEAM_DIR)))
        .find(|dir| dir.join("steamapps").is_dir())
        .ok_or(SteamError::NotFound)
}

fn registry_path(root: &RegKey, subkey: &str, value: &str) -> Option<PathBuf> {
    let key = root.open_subkey(subkey).ok()?;
    let path: String = key.get_value(value).ok()?;
    // SteamPath is stored with forward slashes.
    Some(PathBuf::from(path.replace('/', "\\")))
}
