//! Track model, metadata probing and audio-file discovery.
//!
//! Everything that needs a track's duration or display metadata goes
//! through the probe here; the scanner feeds the file-picker overlay.

mod model;
mod probe;
mod scan;

pub use model::*;
pub use probe::*;
pub use scan::*;

#[cfg(test)]
mod tests;
