//! App manifests (`appmanifest_<appid>.acf`).
//!
//! Each manifest holds a single `AppState` block describing one installed or
//! queued app. Field names are matched case-insensitively, since old Steam
//! clients wrote `appID` where current ones write `appid`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use gami_vdf::{Block, DecodeOptions, Node};
use serde::{Deserialize, Serialize};

use crate::{SteamError, load_vdf};

/// Install state of an app as seen by the library manager.
///
/// The scanner only derives `Installed`, `Installing` and `Queued` from
/// manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstallStatus {
    Installed,
    Installing,
    /// Owned but not installed. Never read from a manifest; reserved for
    /// records the library manager builds from ownership data.
    InLibrary,
    Queued,
}

/// Fields of an `AppState` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub app_id: u32,
    pub name: String,
    pub install_dir: Option<String>,
    pub state_flags: Option<u32>,
    pub last_updated: Option<u64>,
    /// Unix seconds; absent when the app was never launched.
    pub last_played: Option<u64>,
    pub size_on_disk: Option<u64>,
    pub build_id: Option<u64>,
    pub bytes_to_download: Option<u64>,
    pub bytes_downloaded: Option<u64>,
    pub language: Option<String>,
}

impl AppManifest {
    /// Maps a decoded manifest file (root containing `AppState`).
    pub fn from_document(root: &Block) -> Result<Self, SteamError> {
        let state = field(root, "AppState")
            .and_then(Node::as_block)
            .ok_or_else(|| SteamError::Manifest("missing AppState block".into()))?;
        Self::from_block(state)
    }

    /// Maps the contents of an `AppState` block.
    pub fn from_block(state: &Block) -> Result<Self, SteamError> {
        let app_id = number(state, "appid")?
            .ok_or_else(|| SteamError::Manifest("missing appid".into()))?;
        let name = text(state, "name")
            .ok_or_else(|| SteamError::Manifest(format!("app {app_id}: missing name")))?
            .to_owned();

        let language = field(state, "UserConfig")
            .and_then(Node::as_block)
            .and_then(|config| text(config, "language"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_owned);

        Ok(Self {
            app_id,
            name,
            install_dir: text(state, "installdir")
                .filter(|dir| !dir.is_empty())
                .map(str::to_owned),
            state_flags: number(state, "StateFlags")?,
            last_updated: number(state, "LastUpdated")?,
            last_played: number(state, "LastPlayed")?.filter(|&t| t != 0),
            size_on_disk: number(state, "SizeOnDisk")?,
            build_id: number(state, "buildid")?,
            bytes_to_download: number(state, "BytesToDownload")?,
            bytes_downloaded: number(state, "BytesDownloaded")?,
            language,
        })
    }

    /// Derives the install status from the download counters.
    ///
    /// No download recorded yet means the app is queued; a finished download
    /// means it is installed.
    pub fn install_status(&self) -> InstallStatus {
        match self.bytes_downloaded {
            None => InstallStatus::Queued,
            Some(done) if Some(done) == self.bytes_to_download => InstallStatus::Installed,
            Some(_) => InstallStatus::Installing,
        }
    }

    /// Returns `<steamapps>/common/<installdir>` when an install dir is set.
    pub fn install_path(&self, steamapps: &Path) -> Option<PathBuf> {
        self.install_dir
            .as_ref()
            .map(|dir| steamapps.join("common").join(dir))
    }
}

/// Reads and maps a manifest file.
pub fn load_app_manifest(path: &Path, options: &DecodeOptions) -> Result<AppManifest, SteamError> {
    let root = load_vdf(path, options)?;
    AppManifest::from_document(&root).map_err(|e| match e {
        SteamError::Manifest(reason) => {
            SteamError::Manifest(format!("{}: {reason}", path.display()))
        }
        other => other,
    })
}

/// Returns the app ID encoded in a manifest file name, e.g.
/// `appmanifest_570.acf` → 570.
pub fn manifest_app_id(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("appmanifest_")?
        .strip_suffix(".acf")?
        .parse()
        .ok()
}

fn field<'a>(block: &'a Block, key: &str) -> Option<&'a Node> {
    block.get(key).or_else(|| {
        block
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, node)| node)
    })
}

fn text<'a>(block: &'a Block, key: &str) -> Option<&'a str> {
    field(block, key).and_then(Node::as_str)
}

fn number<T: FromStr>(block: &Block, key: &str) -> Result<Option<T>, SteamError> {
    match text(block, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SteamError::Manifest(format!("{key} is not a number: {raw:?}"))),
    }
}
