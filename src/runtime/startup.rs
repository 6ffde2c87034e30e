use std::path::Path;

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, clamp_volume};
use crate::config;
use crate::library;

/// Seed the playlist from a directory: every discovered audio file is
/// appended in browse order, which becomes the insertion order.
pub fn populate_from_dir(app: &mut App, dir: &Path, settings: &config::LibrarySettings) {
    for path in library::browse(dir, settings) {
        app.append_track(library::track_from_path(&path));
    }
    if app.has_tracks() {
        app.set_status(format!("Loaded {} tracks", app.playlist.len()));
    }
}

pub fn apply_playback_defaults(
    app: &mut App,
    audio_player: &AudioPlayer,
    settings: &config::Settings,
) {
    app.volume = clamp_volume(settings.audio.initial_volume);
    let _ = audio_player.send(AudioCmd::SetVolume(app.volume));
}
