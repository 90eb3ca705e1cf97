use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::AudioAsset;

/// Lower-cased extensions without the leading dot.
pub(super) struct Extensions(HashSet<String>);

impl Extensions {
    pub(super) fn from_settings(settings: &LibrarySettings) -> Self {
        Self(
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub(super) fn matches(&self, path: &Path) -> bool {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => self.0.contains(&ext.to_ascii_lowercase()),
            None => false,
        }
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Walk `dir` and return every audio file in file-name order.
///
/// Unreadable entries are skipped; the order of the result is the
/// enumeration order every screen relies on.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<AudioAsset> {
    let extensions = Extensions::from_settings(settings);
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Depth 1 is the root's own entries.
    match (settings.recursive, settings.max_depth) {
        (false, _) => walker = walker.max_depth(1),
        (true, Some(depth)) => walker = walker.max_depth(depth),
        (true, None) => {}
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::debug!(%err, "skipping unreadable library entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .filter(|e| extensions.matches(e.path()))
        .map(|e| AudioAsset::from_path(e.path()))
        .collect()
}
