//! Audio-related small types and handles.
//!
//! This module defines the command enum, the shared playback info and the
//! handle type used by the UI to observe the engine.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Load the given file and play it from the beginning.
    Play(PathBuf),
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback immediately.
    Stop,
    /// Set the output volume; values are clamped to 0.0..=1.0.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Elapsed playback time for the loaded track.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Set once when a track plays to completion; the event loop consumes
    /// it to advance the playlist cursor.
    pub finished: bool,
    /// Set when a file could not be opened or decoded; the event loop
    /// consumes it and surfaces the message.
    pub error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            playing: false,
            finished: false,
            error: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Clamp a requested volume into the engine's accepted range.
pub fn clamp_volume(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
