//! Library folder discovery from `libraryfolders.vdf`.

use std::path::PathBuf;

use gami_vdf::{Block, DecodeOptions, Node};

use crate::paths::Paths;
use crate::{SteamError, load_vdf};

/// Returns the `steamapps` directories of every Steam library.
///
/// The base installation comes first, followed by the folders listed in
/// `libraryfolders.vdf` in file order. Only existing directories are
/// returned, each once. A missing `libraryfolders.vdf` is not an error.
pub fn library_folders(
    paths: &Paths,
    options: &DecodeOptions,
) -> Result<Vec<PathBuf>, SteamError> {
    let mut roots = vec![paths.base_dir().clone()];

    match load_vdf(&paths.library_folders_path(), options) {
        Ok(root) => roots.extend(folder_roots(&root)),
        Err(SteamError::NotFound) => {
            tracing::debug!("no libraryfolders.vdf, using base library only");
        }
        Err(e) => return Err(e),
    }

    let mut dirs: Vec<PathBuf> = Vec::new();
    for root in roots {
        let steamapps = root.join("steamapps");
        if steamapps.is_dir() && !dirs.contains(&steamapps) {
            dirs.push(steamapps);
        }
    }

    tracing::debug!(count = dirs.len(), "found Steam libraries");
    Ok(dirs)
}

/// Extracts library root paths from a decoded `libraryfolders.vdf`.
///
/// Current files map numeric keys to blocks with a `path` entry; older files
/// map them straight to the path string. Non-numeric keys such as
/// `contentstatsid` are ignored.
pub fn folder_roots(root: &Block) -> Vec<PathBuf> {
    let Some(folders) = root
        .get_block("libraryfolders")
        .or_else(|| root.get_block("LibraryFolders"))
    else {
        return Vec::new();
    };

    folders
        .iter()
        .filter(|(key, _)| key.parse::<u32>().is_ok())
        .filter_map(|(_, node)| match node {
            Node::Leaf(path) => Some(path.as_str()),
            Node::Block(folder) => folder.get_str("path"),
        })
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect()
}
