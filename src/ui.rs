//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, BrowseTarget, Overlay, PlaybackState};
use crate::config::{TimeField, UiSettings};
use crate::library::format_duration;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected track".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    map.insert("s".to_string(), "stop".to_string());
    map.insert("+/-".to_string(), "volume".to_string());
    map.insert("a".to_string(), "add track".to_string());
    map.insert("u".to_string(), "update track".to_string());
    map.insert("x".to_string(), "delete track".to_string());
    map.insert("D".to_string(), "deleted log".to_string());
    map.insert("H".to_string(), "update history".to_string());
    map.insert("K".to_string(), "metadata".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text for the footer.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "enter", "space/p", "s", "+/-", "gg/G", "a", "u", "x", "D", "H", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_duration(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_duration(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_duration(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn status_text(app: &App, ui_settings: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = app.current_display_name() {
        let state = match app.playback {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        };

        let total = app.playlist.current().and_then(|t| t.duration);
        let elapsed = app
            .playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|info| info.elapsed))
            .unwrap_or(Duration::ZERO);

        if app.playback == PlaybackState::Stopped {
            parts.push(format!("Track: {name}"));
        } else if let Some(time) = now_playing_time_text(elapsed, total, ui_settings) {
            parts.push(format!("Track: {name} [{time}]"));
        } else {
            parts.push(format!("Track: {name}"));
        }
        parts.push(state.to_string());
    } else {
        parts.push("Playlist empty".to_string());
    }

    parts.push(format!("Vol: {:.0}%", app.volume * 100.0));
    parts.push(format!("Tracks: {}", app.playlist.len()));

    if let Some(dir) = &app.music_dir {
        parts.push(format!("Dir: {}", dir));
    }

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
        .borders(Borders::ALL)
        .title(title.to_string())
}

fn draw_text_popup(frame: &mut Frame, area: Rect, title: &str, lines: Vec<String>, empty: &str) {
    let popup_area = centered_rect_sized(60, 14, area);
    frame.render_widget(Clear, popup_area);

    let body = if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    };
    let paragraph = Paragraph::new(body)
        .block(popup_block(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

fn draw_browser_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(browser) = app.browser.as_ref() else {
        return;
    };

    let title = match browser.target {
        BrowseTarget::Add => " add track (enter picks, esc closes) ",
        BrowseTarget::Update(_) => " pick replacement file (enter picks, esc closes) ",
    };

    let popup_area = centered_rect_sized(72, 16, area);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = browser
        .entries
        .iter()
        .map(|p| {
            let name = p
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string();
            ListItem::new(name)
        })
        .collect();

    let list = List::new(items)
        .block(popup_block(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if !browser.entries.is_empty() {
        state.select(Some(browser.selected));
    }
    frame.render_stateful_widget(list, popup_area, &mut state);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rondo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let rows: Vec<String> = app
            .playlist
            .iter()
            .map(|t| format!("{} [{}]", t.display, t.duration_text))
            .collect();
        let cursor_pos = app.playlist.cursor_position();

        // Center the selected item when possible by creating a visible window.
        // Important: only build ListItems for the visible window (avoid allocating the entire list).
        let total = rows.len();
        let list_height = chunks[2].height as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = rows[start..end]
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                // Mark the playlist cursor so "current" is visible even when
                // the selection is elsewhere.
                if cursor_pos == Some(start + offset) {
                    ListItem::new(format!("♪ {row}"))
                } else {
                    ListItem::new(format!("  {row}"))
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Overlay popups (keep the list visible under them)
    let list_area = chunks[2];
    match app.overlay {
        Overlay::Deleted => {
            let lines: Vec<String> = app
                .deleted
                .iter()
                .map(|t| format!("{} [{}]", t.display, t.duration_text))
                .collect();
            draw_text_popup(
                frame,
                list_area,
                " deleted tracks (D closes) ",
                lines,
                "No deleted tracks",
            );
        }
        Overlay::History => {
            draw_text_popup(
                frame,
                list_area,
                " update history (H closes) ",
                app.history.clone(),
                "No updates yet",
            );
        }
        Overlay::Metadata => {
            let meta = if let Some(track) = app.selected_track() {
                format!(
                    "Track: {}\nArtist: {}\nAlbum: {}\nGenre: {}\nDuration: {}\nPath: {}",
                    track.display,
                    track.artist,
                    track.album,
                    track.genre,
                    track.duration_text,
                    track.path.display()
                )
            } else {
                "No track selected".to_string()
            };
            let popup_area = centered_rect_sized(72, 9, list_area);
            frame.render_widget(Clear, popup_area);
            let meta_paragraph = Paragraph::new(meta)
                .block(popup_block(" metadata (K closes) "))
                .wrap(Wrap { trim: true });
            frame.render_widget(meta_paragraph, popup_area);
        }
        Overlay::Browser => draw_browser_popup(frame, app, list_area),
        Overlay::None => {}
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
