//! Installed app scanning.
//!
//! Reads every `appmanifest_*.acf` in a `steamapps` directory and maps it to
//! an [`InstallRecord`]. A manifest that cannot be read or mapped is skipped
//! and reported; it never aborts the rest of the scan.

use std::path::{Path, PathBuf};

use gami_vdf::DecodeOptions;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::SteamError;
use crate::library::library_folders;
use crate::manifest::{AppManifest, InstallStatus, load_app_manifest, manifest_app_id};
use crate::paths::{ArtworkType, Paths};

/// Library type reported for every Steam record.
pub const LIBRARY_TYPE: &str = "steam";

/// An installed (or queued) app, ready to hand to the library manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRecord {
    pub library_type: String,
    /// Steam app ID as a string.
    pub library_id: String,
    pub name: String,
    pub install_status: InstallStatus,
    pub install_path: Option<PathBuf>,
    pub last_played_epoch: Option<u64>,
    pub icon_path: Option<PathBuf>,
}

impl InstallRecord {
    /// Builds a record for a manifest found in `steamapps`.
    pub fn from_manifest(manifest: &AppManifest, steamapps: &Path, paths: &Paths) -> Self {
        Self {
            library_type: LIBRARY_TYPE.into(),
            library_id: manifest.app_id.to_string(),
            name: manifest.name.clone(),
            install_status: manifest.install_status(),
            install_path: manifest.install_path(steamapps),
            last_played_epoch: manifest.last_played,
            icon_path: paths.cached_artwork(manifest.app_id, ArtworkType::Icon),
        }
    }

    fn app_id(&self) -> u32 {
        self.library_id.parse().unwrap_or(u32::MAX)
    }
}

/// A manifest that was found but could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning one or more libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Records sorted by numeric app ID.
    pub records: Vec<InstallRecord>,
    pub skipped: Vec<SkippedManifest>,
}

impl ScanReport {
    /// Merges `other` into this report. Apps already present are not
    /// added again.
    fn merge(&mut self, other: ScanReport) {
        for record in other.records {
            if self
                .records
                .iter()
                .any(|r| r.library_id == record.library_id)
            {
                debug!(app_id = %record.library_id, "app found in several libraries, keeping first");
                continue;
            }
            self.records.push(record);
        }
        self.skipped.extend(other.skipped);
        self.sort();
    }

    fn sort(&mut self) {
        self.records.sort_by_key(InstallRecord::app_id);
        self.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

/// Scans a single `steamapps` directory.
pub fn scan_library(
    steamapps: &Path,
    paths: &Paths,
    options: &DecodeOptions,
) -> Result<ScanReport, SteamError> {
    let entries = std::fs::read_dir(steamapps).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(format!("failed to read {}: {e}", steamapps.display()))
        }
    })?;

    let mut report = ScanReport::default();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;
        let path = entry.path();

        if manifest_app_id(&entry.file_name().to_string_lossy()).is_none() {
            continue;
        }

        debug!(path = %path.display(), "reading app manifest");
        match load_app_manifest(&path, options) {
            Ok(manifest) => {
                report
                    .records
                    .push(InstallRecord::from_manifest(&manifest, steamapps, paths));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping app manifest");
                report.skipped.push(SkippedManifest {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    report.sort();
    info!(
        library = %steamapps.display(),
        apps = report.records.len(),
        skipped = report.skipped.len(),
        "scanned Steam library"
    );
    Ok(report)
}

/// Scans every library folder of the installation.
///
/// Fails with [`SteamError::NotFound`] when the installation has no library.
pub fn scan_all(paths: &Paths, options: &DecodeOptions) -> Result<ScanReport, SteamError> {
    let libraries = library_folders(paths, options)?;
    if libraries.is_empty() {
        return Err(SteamError::NotFound);
    }

    let mut report = ScanReport::default();
    for steamapps in libraries {
        report.merge(scan_library(&steamapps, paths, options)?);
    }
    Ok(report)
}
