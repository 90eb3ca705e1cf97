#[cfg(unix)]
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One playable file found by a media provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioAsset {
    /// File name including extension, as shown in lists and titles.
    pub filename: String,
    /// Playable `file://` URI handed to the audio engine.
    pub uri: String,
    pub path: PathBuf,
}

impl AudioAsset {
    pub fn from_path(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        Self {
            filename,
            uri: uri_from_path(path),
            path: path.to_path_buf(),
        }
    }
}

// ASCII bytes escaped in URIs we build. Non-ASCII bytes are always escaped.
const ESCAPED: &[u8] = b"% #?";

/// Build a `file://` URI for `path`.
///
/// The raw path bytes are percent-encoded, so names that are not valid
/// UTF-8 still resolve back to the same file.
pub fn uri_from_path(path: &Path) -> String {
    let raw = path.as_os_str().as_encoded_bytes();
    let mut uri = String::with_capacity(raw.len() + 7);
    uri.push_str("file://");
    for &b in raw {
        if b.is_ascii() && !ESCAPED.contains(&b) {
            uri.push(char::from(b));
        } else {
            uri.push_str(&format!("%{b:02X}"));
        }
    }
    uri
}

/// Resolve a `file://` URI (or a bare filesystem path) back to a path.
///
/// Returns `None` for other URI schemes.
pub fn path_from_uri(uri: &str) -> Option<PathBuf> {
    let rest = match uri.strip_prefix("file://") {
        Some(rest) => rest,
        None if uri.contains("://") => return None,
        None => return Some(PathBuf::from(uri)),
    };
    Some(path_from_bytes(percent_decode(rest.as_bytes())))
}

fn percent_decode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(v) = hex {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}
