use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::audio::PlaybackHandle;
use crate::library::{self, Track};
use crate::playlist::Playlist;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Recoverable user-action failures. Every variant is surfaced on the
/// status line; none changes playlist structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("not in playlist: {locator}")]
    NotFound { locator: String },
    #[error("no track selected")]
    NoSelection,
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Which popup is currently drawn over the track list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    None,
    Deleted,
    History,
    Metadata,
    Browser,
}

/// What the file picker is choosing a file for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseTarget {
    /// Append the chosen file to the playlist.
    Add,
    /// Replace the locator of the entry identified by this path.
    Update(PathBuf),
}

/// State of the file-picker overlay.
pub struct Browser {
    pub target: BrowseTarget,
    pub entries: Vec<PathBuf>,
    pub selected: usize,
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    /// Snapshots of removed entries, append-only, display only.
    pub deleted: Vec<Track>,
    /// Human-readable update records, append-only, display only.
    pub history: Vec<String>,

    pub selected: usize,
    pub overlay: Overlay,
    pub browser: Option<Browser>,
    pub status: Option<String>,

    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    /// Locator currently loaded into the playback engine, if any.
    pub now_playing: Option<PathBuf>,
    pub volume: f32,

    pub music_dir: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            playlist: Playlist::new(),
            deleted: Vec::new(),
            history: Vec::new(),

            selected: 0,
            overlay: Overlay::None,
            browser: None,
            status: None,

            playback: PlaybackState::Stopped,
            playback_handle: None,
            now_playing: None,
            volume: 0.5,

            music_dir: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Record the directory the file picker browses.
    pub fn set_music_dir(&mut self, dir: String) {
        self.music_dir = Some(dir);
    }

    /// Return true if the playlist contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    /// Replace the transient status-line message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Surface a recoverable failure on the status line.
    pub fn report(&mut self, err: &AppError) {
        self.status = Some(err.to_string());
    }

    /// Display name of the track under the playlist cursor.
    pub fn current_display_name(&self) -> Option<&str> {
        self.playlist.current().map(|t| t.display.as_str())
    }

    /// The track behind the list selection, in iteration order.
    pub fn selected_track(&self) -> Option<&Track> {
        self.playlist.iter().nth(self.selected)
    }

    /// Locator of the selected entry, or `NoSelection` on an empty list.
    pub fn selected_locator(&self) -> Result<PathBuf, AppError> {
        self.selected_track()
            .map(|t| t.path.clone())
            .ok_or(AppError::NoSelection)
    }

    /// Append a track at the playlist tail.
    pub fn append_track(&mut self, track: Track) {
        self.playlist.push_back(track);
    }

    /// Move the list selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the list selection up, wrapping at the start.
    pub fn select_prev(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    fn clamp_selected(&mut self) {
        let len = self.playlist.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Remove the entry with `locator` from the playlist and snapshot it
    /// into the deleted log. If that entry was loaded into the engine,
    /// playback state is reset; the caller is responsible for telling the
    /// engine to stop.
    pub fn delete_track(&mut self, locator: &Path) -> Result<Track, AppError> {
        let track = self
            .playlist
            .remove(locator)
            .ok_or_else(|| AppError::NotFound {
                locator: locator.display().to_string(),
            })?;

        if self.now_playing.as_deref() == Some(locator) {
            self.now_playing = None;
            self.playback = PlaybackState::Stopped;
        }
        self.deleted.push(track.clone());
        self.clamp_selected();
        Ok(track)
    }

    /// Replace the locator of the entry identified by `locator` with
    /// `new_path`, in place: position, artist, album and genre are
    /// preserved; display name, duration and duration text are rederived.
    /// Appends exactly one record to the update history.
    pub fn replace_track_source(
        &mut self,
        locator: &Path,
        new_path: &Path,
        new_duration: Option<Duration>,
    ) -> Result<(), AppError> {
        let track = self
            .playlist
            .find_mut(locator)
            .ok_or_else(|| AppError::NotFound {
                locator: locator.display().to_string(),
            })?;

        let old_display = track.display.clone();
        track.path = new_path.to_path_buf();
        track.display = library::display_name(new_path);
        track.duration = new_duration;
        track.duration_text = library::duration_text(new_duration);
        let new_display = track.display.clone();

        self.history
            .push(format!("Updated {old_display} to {new_display}"));
        Ok(())
    }

    /// Toggle an overlay: a second press of the same key closes it.
    pub fn toggle_overlay(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
    }

    /// Open the file picker over `entries` for the given purpose.
    pub fn open_browser(&mut self, target: BrowseTarget, entries: Vec<PathBuf>) {
        self.browser = Some(Browser {
            target,
            entries,
            selected: 0,
        });
        self.overlay = Overlay::Browser;
    }

    /// Close the file picker without acting.
    pub fn close_browser(&mut self) {
        self.browser = None;
        self.overlay = Overlay::None;
    }

    /// Nudge the volume by `step`, clamped to the engine's 0.0..=1.0 range.
    pub fn adjust_volume(&mut self, step: f32) {
        self.volume = (self.volume + step).clamp(0.0, 1.0);
    }
}
