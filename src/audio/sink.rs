//! Utilities for creating `rodio` sinks from file locators.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink`; failures are reported, never panicked, so a bad file
//! cannot take the engine down.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

/// Create a paused `Sink` for the file at `path`.
pub(super) fn create_sink(handle: &OutputStream, path: &Path) -> Result<Sink, String> {
    let file =
        File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| format!("cannot decode {}: {e}", path.display()))?;

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
