use super::*;
use crate::library::{Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_GENRE};
use std::path::PathBuf;
use std::time::Duration;

fn t(name: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{name}.mp3")),
        display: name.into(),
        artist: UNKNOWN_ARTIST.into(),
        album: UNKNOWN_ALBUM.into(),
        genre: UNKNOWN_GENRE.into(),
        duration: None,
        duration_text: "0:00".into(),
    }
}

fn loc(name: &str) -> PathBuf {
    PathBuf::from(format!("/music/{name}.mp3"))
}

fn app_with(names: &[&str]) -> App {
    let mut app = App::new();
    for name in names {
        app.append_track(t(name));
    }
    app
}

#[test]
fn selected_locator_on_empty_list_is_no_selection() {
    let app = App::new();
    assert_eq!(app.selected_locator(), Err(AppError::NoSelection));
}

#[test]
fn selection_wraps_both_ways() {
    let mut app = app_with(&["a", "b", "c"]);
    assert_eq!(app.selected, 0);

    app.select_prev();
    assert_eq!(app.selected, 2);
    app.select_next();
    assert_eq!(app.selected, 0);
    app.select_next();
    assert_eq!(app.selected_locator().unwrap(), loc("b"));
}

#[test]
fn delete_moves_snapshot_into_deleted_log() {
    let mut app = app_with(&["a", "b", "c"]);

    let removed = app.delete_track(&loc("b")).unwrap();
    assert_eq!(removed.display, "b");
    assert_eq!(app.playlist.len(), 2);
    assert_eq!(app.deleted.len(), 1);
    assert_eq!(app.deleted[0].display, "b");
    // logs are never touched by later playlist mutation
    app.delete_track(&loc("a")).unwrap();
    assert_eq!(app.deleted[0].display, "b");
    assert_eq!(app.deleted[1].display, "a");
}

#[test]
fn delete_missing_locator_is_not_found_and_structure_is_unchanged() {
    let mut app = app_with(&["a", "b"]);

    let err = app.delete_track(&loc("zzz")).unwrap_err();
    assert_eq!(
        err,
        AppError::NotFound {
            locator: "/music/zzz.mp3".into()
        }
    );
    assert_eq!(app.playlist.len(), 2);
    assert!(app.deleted.is_empty());
}

#[test]
fn delete_of_loaded_track_resets_playback_state() {
    let mut app = app_with(&["a", "b"]);
    app.now_playing = Some(loc("a"));
    app.playback = PlaybackState::Playing;

    app.delete_track(&loc("a")).unwrap();
    assert_eq!(app.now_playing, None);
    assert_eq!(app.playback, PlaybackState::Stopped);

    // deleting some other entry leaves playback alone
    app.now_playing = Some(loc("b"));
    app.playback = PlaybackState::Playing;
    app.append_track(t("c"));
    app.delete_track(&loc("c")).unwrap();
    assert_eq!(app.now_playing, Some(loc("b")));
    assert_eq!(app.playback, PlaybackState::Playing);
}

#[test]
fn delete_clamps_selection_to_the_shrunken_list() {
    let mut app = app_with(&["a", "b", "c"]);
    app.selected = 2;

    app.delete_track(&loc("c")).unwrap();
    assert_eq!(app.selected, 1);

    app.delete_track(&loc("a")).unwrap();
    app.delete_track(&loc("b")).unwrap();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
}

#[test]
fn replace_track_source_updates_in_place_and_records_history() {
    let mut app = app_with(&["a", "b", "c"]);
    // cursor on "a": updating "b" must not disturb it
    assert_eq!(app.current_display_name(), Some("a"));

    app.replace_track_source(&loc("b"), &loc("d"), Some(Duration::from_secs(61)))
        .unwrap();

    let order: Vec<&str> = app.playlist.iter().map(|t| t.display.as_str()).collect();
    assert_eq!(order, vec!["a", "d", "c"]);
    assert_eq!(app.current_display_name(), Some("a"));

    let updated = app.playlist.find(&loc("d")).unwrap();
    assert_eq!(updated.duration, Some(Duration::from_secs(61)));
    assert_eq!(updated.duration_text, "1:01");
    // display metadata is preserved across the swap
    assert_eq!(updated.artist, UNKNOWN_ARTIST);
    assert_eq!(updated.album, UNKNOWN_ALBUM);
    assert_eq!(updated.genre, UNKNOWN_GENRE);

    assert_eq!(app.history, vec!["Updated b to d".to_string()]);
}

#[test]
fn replace_track_source_missing_locator_is_not_found() {
    let mut app = app_with(&["a"]);

    let err = app
        .replace_track_source(&loc("nope"), &loc("d"), None)
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    assert!(app.history.is_empty());
}

#[test]
fn overlay_toggle_closes_on_second_press() {
    let mut app = App::new();
    app.toggle_overlay(Overlay::Deleted);
    assert_eq!(app.overlay, Overlay::Deleted);
    app.toggle_overlay(Overlay::History);
    assert_eq!(app.overlay, Overlay::History);
    app.toggle_overlay(Overlay::History);
    assert_eq!(app.overlay, Overlay::None);
}

#[test]
fn browser_open_and_close_round_trip() {
    let mut app = App::new();
    app.open_browser(BrowseTarget::Add, vec![loc("a"), loc("b")]);
    assert_eq!(app.overlay, Overlay::Browser);
    assert_eq!(app.browser.as_ref().unwrap().entries.len(), 2);
    assert_eq!(app.browser.as_ref().unwrap().selected, 0);

    app.close_browser();
    assert_eq!(app.overlay, Overlay::None);
    assert!(app.browser.is_none());
}

#[test]
fn adjust_volume_clamps_to_unit_range() {
    let mut app = App::new();
    app.volume = 0.95;
    app.adjust_volume(0.1);
    assert_eq!(app.volume, 1.0);

    app.volume = 0.03;
    app.adjust_volume(-0.05);
    assert_eq!(app.volume, 0.0);
}

#[test]
fn error_messages_read_like_status_lines() {
    assert_eq!(
        AppError::NotFound {
            locator: "/m/x.mp3".into()
        }
        .to_string(),
        "not in playlist: /m/x.mp3"
    );
    assert_eq!(AppError::NoSelection.to_string(), "no track selected");
    assert_eq!(
        AppError::Playback("no decoder".into()).to_string(),
        "playback failed: no decoder"
    );
}
