use std::path::Path;
use std::time::Duration;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};

use super::model::{Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_GENRE};

/// Format a duration as `M:SS`: seconds zero-padded to two digits, minutes
/// as-is.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Duration display text; unreadable files get a dash placeholder.
pub fn duration_text(d: Option<Duration>) -> String {
    match d {
        Some(d) => format_duration(d),
        None => "-:--".to_string(),
    }
}

/// Display name for a locator: the file stem.
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// Tag metadata and total length read from an audio file.
pub struct Probe {
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: Option<Duration>,
}

/// Read tags and duration from `path`. Missing or unreadable tags fall
/// back to the placeholder strings; an unreadable file yields no duration.
pub fn probe(path: &Path) -> Probe {
    let mut artist = UNKNOWN_ARTIST.to_string();
    let mut album = UNKNOWN_ALBUM.to_string();
    let mut genre = UNKNOWN_GENRE.to_string();
    let mut duration: Option<Duration> = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration = Some(tagged.properties().duration());

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                let v = v.trim();
                if !v.is_empty() {
                    artist = v.to_string();
                }
            }
            if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
                let v = v.trim();
                if !v.is_empty() {
                    album = v.to_string();
                }
            }
            if let Some(v) = tag.get_string(&ItemKey::Genre) {
                let v = v.trim();
                if !v.is_empty() {
                    genre = v.to_string();
                }
            }
        }
    }

    Probe {
        artist,
        album,
        genre,
        duration,
    }
}

/// Build a playlist entry for `path`, probing its metadata.
pub fn track_from_path(path: &Path) -> Track {
    let probe = probe(path);
    Track {
        path: path.to_path_buf(),
        display: display_name(path),
        artist: probe.artist,
        album: probe.album,
        genre: probe.genre,
        duration: probe.duration,
        duration_text: duration_text(probe.duration),
    }
}
