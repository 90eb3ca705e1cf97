//! Media library: the assets a player can list and play.
//!
//! `DirectoryProvider` is the filesystem-backed `MediaProvider`; `scan` walks
//! a directory for audio files and `AudioAsset` carries the filename and URI
//! every other module works with.

mod model;
mod provider;
mod scan;

pub use model::{AudioAsset, path_from_uri, uri_from_path};
pub use provider::{DirectoryProvider, MediaProvider, Permission, load_track_list};
