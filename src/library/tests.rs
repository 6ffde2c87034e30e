use super::*;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn format_duration_pads_seconds_not_minutes() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
    assert_eq!(format_duration(Duration::from_secs(59)), "0:59");
    assert_eq!(format_duration(Duration::from_secs(61)), "1:01");
    assert_eq!(format_duration(Duration::from_secs(600)), "10:00");
    assert_eq!(format_duration(Duration::from_secs(3601)), "60:01");
}

#[test]
fn duration_text_placeholder_for_unknown_length() {
    assert_eq!(duration_text(None), "-:--");
    assert_eq!(duration_text(Some(Duration::from_secs(125))), "2:05");
}

#[test]
fn display_name_is_the_file_stem() {
    assert_eq!(display_name(Path::new("/music/Song Title.mp3")), "Song Title");
    assert_eq!(display_name(Path::new("relative.ogg")), "relative");
    assert_eq!(display_name(Path::new("/")), "UNKNOWN");
}

#[test]
fn track_from_unreadable_file_gets_placeholders() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mp3");
    fs::write(&path, b"definitely not audio").unwrap();

    let track = track_from_path(&path);
    assert_eq!(track.display, "garbage");
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert_eq!(track.album, UNKNOWN_ALBUM);
    assert_eq!(track.genre, UNKNOWN_GENRE);
    assert_eq!(track.duration, None);
    assert_eq!(track.duration_text, "-:--");
    assert_eq!(track.path, path);
}
