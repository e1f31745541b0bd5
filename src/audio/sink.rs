//! Preview clips: downloading them and building `rodio` sinks over the bytes.
//!
//! A clip keeps its encoded bytes around so it can be rebuilt at any offset;
//! `skip_duration` on a fresh decoder is the seeking primitive.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::AudioError;

/// Fetch the encoded preview behind `url`.
pub(super) fn download_preview(client: &Client, url: &str) -> Result<Arc<[u8]>, AudioError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(AudioError::Status(status.as_u16()));
    }
    let bytes = response.bytes()?;
    Ok(Arc::from(bytes.as_ref()))
}

/// The clip currently loaded in the audio thread.
pub(super) struct Clip {
    data: Arc<[u8]>,
    sink: Sink,
    /// Where the current sink started inside the clip.
    offset: Duration,
    total: Option<Duration>,
}

impl Clip {
    /// Decode `data` into a paused sink positioned at the start.
    pub(super) fn open(stream: &OutputStream, data: Arc<[u8]>) -> Result<Self, AudioError> {
        let (sink, total) = create_sink_at(stream, &data, Duration::ZERO)?;
        Ok(Self {
            data,
            sink,
            offset: Duration::ZERO,
            total,
        })
    }

    pub(super) fn sink(&self) -> &Sink {
        &self.sink
    }

    pub(super) fn total(&self) -> Option<Duration> {
        self.total
    }

    pub(super) fn position(&self) -> Duration {
        self.offset + self.sink.get_pos()
    }

    pub(super) fn finished(&self) -> bool {
        self.sink.empty()
    }

    /// Replace the sink with one starting at `at`, keeping pause state and volume.
    pub(super) fn rebuild_at(&mut self, stream: &OutputStream, at: Duration) -> Result<(), AudioError> {
        let at = match self.total {
            Some(total) => at.min(total),
            None => at,
        };
        let (sink, _) = create_sink_at(stream, &self.data, at)?;
        sink.set_volume(self.sink.volume());
        if !self.sink.is_paused() {
            sink.play();
        }
        self.sink.stop();
        self.sink = sink;
        self.offset = at;
        Ok(())
    }

    pub(super) fn stop(&self) {
        self.sink.stop();
    }
}

/// Create a paused `Sink` over `data` that starts playback at `start_at`.
fn create_sink_at(
    stream: &OutputStream,
    data: &Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let decoder = Decoder::new(Cursor::new(Arc::clone(data)))?;
    let total = decoder.total_duration();
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
