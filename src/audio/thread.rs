use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::blocking::Client;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::AudioSettings;
use crate::playback::{ResourceEvent, ResourceMsg};

use super::sink::{Clip, download_preview};
use super::types::{AudioCmd, AudioError, applied_volume, supersede_loads};

/// How often position updates are published while playing.
const TICK: Duration = Duration::from_millis(200);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<ResourceMsg>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped; that would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!("audio: failed to open output device: {e}");
                None
            }
        };
        let client = Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| e.to_string());

        let emit = |load_id: u64, event: ResourceEvent| {
            // The receiver only goes away on shutdown.
            let _ = events.send(ResourceMsg { load_id, event });
        };

        let mut clip: Option<Clip> = None;
        let mut load_id: u64 = 0;
        let mut volume = audio_settings.initial_volume;
        let mut muted = false;
        let mut ended_sent = false;
        // Commands already taken off `rx` but not yet handled.
        let mut pending: VecDeque<AudioCmd> = VecDeque::new();

        loop {
            let next = match pending.pop_front() {
                Some(cmd) => Ok(cmd),
                None => rx.recv_timeout(TICK),
            };
            match next {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(url) => {
                        // Only the newest queued load is worth downloading.
                        pending.extend(rx.try_iter());
                        let latest = supersede_loads(url, &mut pending);
                        load_id += 1 + latest.superseded;
                        let url = latest.url;

                        if let Some(old) = clip.take() {
                            old.stop();
                        }
                        ended_sent = false;
                        if pending.iter().any(|c| matches!(c, AudioCmd::Quit { .. })) {
                            continue;
                        }

                        let loaded = load_clip(stream.as_ref(), client.as_ref(), &url);

                        // Another selection arrived during the download.
                        pending.extend(rx.try_iter());
                        if pending.iter().any(|c| matches!(c, AudioCmd::Load(_))) {
                            debug!("audio: {url} superseded while loading");
                            continue;
                        }

                        match loaded {
                            Ok(new_clip) => {
                                new_clip.sink().set_volume(applied_volume(volume, muted));
                                let total = new_clip.total().map_or(0.0, |d| d.as_secs_f64());
                                debug!("audio: loaded {url} ({total:.1}s)");
                                emit(load_id, ResourceEvent::MetadataLoaded(total));
                                emit(load_id, ResourceEvent::Position(0.0));
                                clip = Some(new_clip);
                            }
                            Err(e) => {
                                warn!("audio: failed to load {url}: {e}");
                                emit(load_id, ResourceEvent::Failed(e.to_string()));
                            }
                        }
                    }

                    AudioCmd::Play => {
                        let (Some(c), Some(stream)) = (clip.as_mut(), stream.as_ref()) else {
                            continue;
                        };
                        if c.finished() {
                            if let Err(e) = c.rebuild_at(stream, Duration::ZERO) {
                                emit(load_id, ResourceEvent::Failed(e.to_string()));
                                continue;
                            }
                            ended_sent = false;
                        }
                        c.sink().play();
                    }

                    AudioCmd::Pause => {
                        if let Some(c) = clip.as_ref() {
                            c.sink().pause();
                        }
                    }

                    AudioCmd::Seek(pos) => {
                        let (Some(c), Some(stream)) = (clip.as_mut(), stream.as_ref()) else {
                            continue;
                        };
                        match c.rebuild_at(stream, pos) {
                            Ok(()) => {
                                ended_sent = false;
                                emit(load_id, ResourceEvent::Position(c.position().as_secs_f64()));
                            }
                            Err(e) => {
                                warn!("audio: seek failed: {e}");
                                emit(load_id, ResourceEvent::Failed(e.to_string()));
                            }
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(c) = clip.as_ref() {
                            c.sink().set_volume(applied_volume(volume, muted));
                        }
                    }

                    AudioCmd::SetMuted(m) => {
                        muted = m;
                        if let Some(c) = clip.as_ref() {
                            c.sink().set_volume(applied_volume(volume, muted));
                        }
                    }

                    AudioCmd::Stop => {
                        if let Some(old) = clip.take() {
                            old.stop();
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(c) = clip.take() {
                            fade_out_sink(c.sink(), fade_out_ms);
                            c.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let Some(c) = clip.as_ref() else {
                        continue;
                    };
                    if c.sink().is_paused() {
                        continue;
                    }
                    if c.finished() {
                        if !ended_sent {
                            ended_sent = true;
                            emit(load_id, ResourceEvent::Ended);
                        }
                    } else {
                        emit(load_id, ResourceEvent::Position(c.position().as_secs_f64()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn load_clip(
    stream: Option<&OutputStream>,
    client: Result<&Client, &String>,
    url: &str,
) -> Result<Clip, AudioError> {
    let stream = stream.ok_or(AudioError::NoDevice)?;
    let client = client.map_err(|e| AudioError::Client(e.clone()))?;
    let data = download_preview(client, url)?;
    Clip::open(stream, data)
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
