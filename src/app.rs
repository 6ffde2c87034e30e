//! Application module: the context object shared by the TUI and runtime.
//!
//! `App` in `app::model` owns the playlist, the deleted/update logs and all
//! transient UI and playback state. There are no ambient globals.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
