//! Utilities for creating `rodio` sinks from files.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the decoder's own idea of the total length, when it has one.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|source| EngineError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is the fallback seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Read the track length from the file's tags/properties.
///
/// Many MP3 decoders cannot report a total duration, so this is the second
/// opinion used by the engine.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()).filter(|d| !d.is_zero()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no duration from tags");
            None
        }
    }
}
