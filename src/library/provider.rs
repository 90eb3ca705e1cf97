use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;

use super::model::AudioAsset;
use super::scan::scan;

/// Outcome of asking a provider for access to its media.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Source of the audio assets listed on the tracks screen.
pub trait MediaProvider {
    fn request_permission(&self) -> Permission;
    fn enumerate_audio_assets(&self) -> Vec<AudioAsset>;
}

/// Load the track list the way every screen does: ask once, enumerate once.
///
/// A denied permission yields an empty list rather than an error.
pub fn load_track_list(provider: &dyn MediaProvider) -> (Permission, Vec<AudioAsset>) {
    match provider.request_permission() {
        Permission::Granted => {
            let assets = provider.enumerate_audio_assets();
            tracing::info!(count = assets.len(), "enumerated audio assets");
            (Permission::Granted, assets)
        }
        Permission::Denied => {
            tracing::warn!("media permission denied; track list is empty");
            (Permission::Denied, Vec::new())
        }
    }
}

/// Provider backed by a directory on the local filesystem.
///
/// Permission is granted when the directory can be listed.
pub struct DirectoryProvider {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryProvider {
    pub fn new(root: &Path, settings: LibrarySettings) -> Self {
        // Absolute paths keep the URIs we hand out playable from anywhere.
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        Self { root, settings }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaProvider for DirectoryProvider {
    fn request_permission(&self) -> Permission {
        match fs::read_dir(&self.root) {
            Ok(_) => Permission::Granted,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "cannot read library directory");
                Permission::Denied
            }
        }
    }

    fn enumerate_audio_assets(&self) -> Vec<AudioAsset> {
        scan(&self.root, &self.settings)
    }
}
