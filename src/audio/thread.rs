use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle, clamp_volume};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut volume = clamp_volume(audio_settings.initial_volume);

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        fn do_stop(
            sink: &mut Option<Sink>,
            paused: &mut bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            playback_info: &PlaybackHandle,
        ) {
            if let Some(s) = sink.as_ref() {
                s.stop();
            }
            *sink = None;
            *paused = true;
            *started_at = None;
            *accumulated = Duration::ZERO;
            if let Ok(mut info) = playback_info.lock() {
                info.elapsed = Duration::ZERO;
                info.playing = false;
                info.finished = false;
            }
        }

        fn fade_out_sink(sink: &Sink, from_volume: f32, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(from_volume * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play(path) => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        match create_sink(&stream, &path) {
                            Ok(new_sink) => {
                                new_sink.set_volume(volume);
                                new_sink.play();
                                sink = Some(new_sink);
                                paused = false;
                                started_at = Some(Instant::now());
                                accumulated = Duration::ZERO;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = Duration::ZERO;
                                    info.playing = true;
                                    info.finished = false;
                                    info.error = None;
                                }
                            }
                            Err(msg) => {
                                // Bad file: report and fall back to the stopped state.
                                sink = None;
                                paused = true;
                                started_at = None;
                                accumulated = Duration::ZERO;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = Duration::ZERO;
                                    info.playing = false;
                                    info.finished = false;
                                    info.error = Some(msg);
                                }
                            }
                        }
                    }

                    AudioCmd::Stop => {
                        do_stop(
                            &mut sink,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &playback_info,
                        );
                    }

                    AudioCmd::TogglePause => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                            } else {
                                s.pause();
                            }
                            if paused {
                                // unpausing
                                started_at = Some(Instant::now());
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = true;
                                }
                            } else {
                                // pausing
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = false;
                                }
                            }
                            paused = !paused;
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = clamp_volume(v);
                        if let Some(ref s) = sink {
                            s.set_volume(volume);
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, volume, fade_out_ms);
                            s.stop();
                        }
                        // Update shared state so the UI doesn't keep showing Playing.
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Poll tick: refresh elapsed and detect end-of-track.
                    if let Some(ref s) = sink {
                        if !paused && s.empty() {
                            sink = None;
                            paused = true;
                            started_at = None;
                            accumulated = Duration::ZERO;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = false;
                                info.finished = true;
                            }
                        } else if !paused {
                            let elapsed =
                                accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                            if let Ok(mut info) = playback_info.lock() {
                                info.elapsed = elapsed;
                            }
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
