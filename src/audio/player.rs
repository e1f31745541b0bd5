use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::playback::{PlaybackResource, ResourceMsg};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, seek_position};

/// Handle to the audio thread. Events come back on the sender passed to `new`.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings, events: Sender<ResourceMsg>) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let audio_handle = spawn_audio_thread(rx, events, audio_settings);

        Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        // Only fails once the thread has exited, and then there is nothing to drive.
        let _ = self.tx.send(cmd);
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackResource for AudioPlayer {
    fn load(&mut self, url: &str) {
        self.send(AudioCmd::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.send(AudioCmd::Seek(seek_position(seconds)));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.send(AudioCmd::SetMuted(muted));
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }
}
