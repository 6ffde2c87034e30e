use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, AppError, BrowseTarget, Overlay, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known loaded locator as emitted to MPRIS.
    pub last_mpris_track: Option<PathBuf>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris_track: None,
            last_mpris_playback: app.playback,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        sync_playback(app, audio_player);

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        if app.now_playing != state.last_mpris_track || app.playback != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_track = app.now_playing.clone();
            state.last_mpris_playback = app.playback;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, mpris, control_tx, state)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Consume the engine's `finished`/`error` signals. Playlist mutation stays
/// on this thread: on end-of-track the cursor advances here, never in the
/// audio thread.
fn sync_playback(app: &mut App, audio_player: &AudioPlayer) {
    let Some(handle) = app.playback_handle.as_ref().cloned() else {
        return;
    };

    let mut finished = false;
    let mut error: Option<String> = None;
    if let Ok(mut info) = handle.lock() {
        if info.finished {
            info.finished = false;
            finished = true;
        }
        if let Some(e) = info.error.take() {
            error = Some(e);
        }
    }

    if let Some(msg) = error {
        app.playback = PlaybackState::Stopped;
        app.now_playing = None;
        app.report(&AppError::Playback(msg));
    }

    if finished {
        // End of track: play the successor, or come to rest at the tail.
        if app.playlist.cursor_advance() {
            play_current(app, audio_player);
        } else {
            app.playback = PlaybackState::Stopped;
            app.now_playing = None;
        }
    }
}

/// Load and play the track under the playlist cursor.
fn play_current(app: &mut App, audio_player: &AudioPlayer) {
    let Some((path, display)) = app
        .playlist
        .current()
        .map(|t| (t.path.clone(), t.display.clone()))
    else {
        return;
    };

    let _ = audio_player.send(AudioCmd::Play(path.clone()));
    app.now_playing = Some(path);
    app.playback = PlaybackState::Playing;
    app.set_status(format!("Now playing: {display}"));
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Playing;
                update_mpris(mpris, app);
            }
            PlaybackState::Stopped | PlaybackState::Playing => {
                if app.has_tracks() {
                    play_current(app, audio_player);
                    update_mpris(mpris, app);
                }
            }
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Paused;
                update_mpris(mpris, app);
            }
        }
        ControlCmd::PlayPause => {
            match app.playback {
                PlaybackState::Stopped => {
                    if app.has_tracks() {
                        play_current(app, audio_player);
                    }
                }
                PlaybackState::Playing => {
                    let _ = audio_player.send(AudioCmd::TogglePause);
                    app.playback = PlaybackState::Paused;
                }
                PlaybackState::Paused => {
                    let _ = audio_player.send(AudioCmd::TogglePause);
                    app.playback = PlaybackState::Playing;
                }
            }
            update_mpris(mpris, app);
        }
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
            app.now_playing = None;
            update_mpris(mpris, app);
        }
        ControlCmd::Next => {
            // Silent no-op at the tail.
            if app.playlist.cursor_advance() {
                play_current(app, audio_player);
                update_mpris(mpris, app);
            }
        }
        ControlCmd::Prev => {
            // Silent no-op at the head.
            if app.playlist.cursor_retreat() {
                play_current(app, audio_player);
                update_mpris(mpris, app);
            }
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    match app.overlay {
        Overlay::Browser => {
            state.pending_gg = false;
            handle_browser_key(key, app, audio_player);
            update_mpris(mpris, app);
            return Ok(false);
        }
        Overlay::Deleted | Overlay::History | Overlay::Metadata => {
            match key.code {
                KeyCode::Esc => app.overlay = Overlay::None,
                KeyCode::Char('D') if app.overlay == Overlay::Deleted => {
                    app.overlay = Overlay::None;
                }
                KeyCode::Char('H') if app.overlay == Overlay::History => {
                    app.overlay = Overlay::None;
                }
                KeyCode::Char('K') if app.overlay == Overlay::Metadata => {
                    app.overlay = Overlay::None;
                }
                _ => {}
            }
            return Ok(false);
        }
        Overlay::None => {}
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                if app.has_tracks() {
                    app.selected = 0;
                }
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            if app.has_tracks() {
                app.selected = app.playlist.len() - 1;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.select_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.select_prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            match app.selected_locator() {
                Ok(locator) => {
                    if app.playlist.set_cursor(&locator) {
                        play_current(app, audio_player);
                        update_mpris(mpris, app);
                    }
                }
                Err(e) => app.report(&e),
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            app.adjust_volume(settings.controls.volume_step);
            let _ = audio_player.send(AudioCmd::SetVolume(app.volume));
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            app.adjust_volume(-settings.controls.volume_step);
            let _ = audio_player.send(AudioCmd::SetVolume(app.volume));
        }
        KeyCode::Char('a') => {
            state.pending_gg = false;
            open_file_picker(app, settings, BrowseTarget::Add);
        }
        KeyCode::Char('u') => {
            state.pending_gg = false;
            match app.selected_locator() {
                Ok(locator) => open_file_picker(app, settings, BrowseTarget::Update(locator)),
                Err(e) => app.report(&e),
            }
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            delete_selected(app, audio_player);
            update_mpris(mpris, app);
        }
        KeyCode::Char('D') => {
            state.pending_gg = false;
            app.toggle_overlay(Overlay::Deleted);
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            app.toggle_overlay(Overlay::History);
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_overlay(Overlay::Metadata);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}

/// Open the file-picker overlay over the configured music directory.
fn open_file_picker(app: &mut App, settings: &config::Settings, target: BrowseTarget) {
    let dir = app.music_dir.clone().unwrap_or_else(|| ".".to_string());
    let entries = library::browse(Path::new(&dir), &settings.library);
    if entries.is_empty() {
        app.set_status(format!("No audio files found under {dir}"));
        return;
    }
    app.open_browser(target, entries);
}

/// Remove the selected entry: snapshot it into the deleted log and stop the
/// engine when the deleted entry was the one loaded.
fn delete_selected(app: &mut App, audio_player: &AudioPlayer) {
    let locator = match app.selected_locator() {
        Ok(l) => l,
        Err(e) => {
            app.report(&e);
            return;
        }
    };

    let was_playing = app.now_playing.as_deref() == Some(locator.as_path());
    match app.delete_track(&locator) {
        Ok(track) => {
            if was_playing {
                let _ = audio_player.send(AudioCmd::Stop);
            }
            app.set_status(format!("Deleted: {}", track.display));
        }
        Err(e) => app.report(&e),
    }
}

fn handle_browser_key(key: KeyEvent, app: &mut App, audio_player: &AudioPlayer) {
    match key.code {
        KeyCode::Esc => app.close_browser(),
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(b) = app.browser.as_mut() {
                if !b.entries.is_empty() {
                    b.selected = (b.selected + 1) % b.entries.len();
                }
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(b) = app.browser.as_mut() {
                if !b.entries.is_empty() {
                    b.selected = if b.selected == 0 {
                        b.entries.len() - 1
                    } else {
                        b.selected - 1
                    };
                }
            }
        }
        KeyCode::Enter => confirm_browser_choice(app, audio_player),
        _ => {}
    }
}

/// Act on the picked file: append for `Add`, in-place source replacement for
/// `Update`. Updating the loaded entry restarts playback with the new file.
fn confirm_browser_choice(app: &mut App, audio_player: &AudioPlayer) {
    let Some(browser) = app.browser.as_ref() else {
        return;
    };
    let Some(path) = browser.entries.get(browser.selected).cloned() else {
        return;
    };
    let target = browser.target.clone();
    app.close_browser();

    match target {
        BrowseTarget::Add => {
            let track = library::track_from_path(&path);
            let display = track.display.clone();
            app.append_track(track);
            app.set_status(format!("Added: {display}"));
        }
        BrowseTarget::Update(locator) => {
            let was_playing = app.now_playing.as_deref() == Some(locator.as_path());
            let probe = library::probe(&path);
            match app.replace_track_source(&locator, &path, probe.duration) {
                Ok(()) => {
                    app.set_status(format!("Updated: {}", library::display_name(&path)));
                    if was_playing && app.playlist.set_cursor(&path) {
                        play_current(app, audio_player);
                    }
                }
                Err(e) => app.report(&e),
            }
        }
    }
}
