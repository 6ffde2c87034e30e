use std::path::PathBuf;
use std::time::Duration;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

/// One playable playlist entry.
///
/// `artist`/`album`/`genre` are display-only and fall back to the
/// placeholder constants when the file carries no tag. `duration_text` is
/// derived from `duration` whenever the locator changes.
#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub display: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: Option<Duration>,
    pub duration_text: String,
}
