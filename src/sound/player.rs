//! Sound player implementation using rodio.
//!
//! The rodio output stream lives on a dedicated audio thread. The player
//! itself only holds a channel to that thread, so it can be shared freely
//! and `play` never blocks the tick loop.

use std::fs::File;
use std::io::BufReader;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// A sound player that uses rodio for audio playback.
pub struct RodioSoundPlayer {
    /// Queue of sounds for the audio thread.
    tx: Sender<SoundSource>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player and its audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (tx, rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || audio_thread(rx, ready_tx))
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| SoundError::DeviceNotAvailable("audio thread exited".to_string()))??;

        debug!("Audio output stream initialized");

        Ok(Self { tx })
    }

    /// Queues a sound for playback.
    ///
    /// Decoding and playback happen on the audio thread; failures there are
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::PlaybackError` if the audio thread has stopped.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.tx
            .send(source.clone())
            .map_err(|_| SoundError::PlaybackError("audio thread stopped".to_string()))
    }
}

/// Owns the output stream and plays queued sounds until the player is dropped.
fn audio_thread(rx: Receiver<SoundSource>, ready_tx: Sender<Result<(), SoundError>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready_tx.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    let _ = ready_tx.send(Ok(()));

    for source in rx.iter() {
        match play_file(&handle, &source) {
            Ok(()) => debug!("Playing sound: {}", source.name()),
            Err(e) => warn!("Failed to play sound '{}': {}", source.name(), e),
        }
    }

    debug!("Audio thread stopped");
}

fn play_file(handle: &OutputStreamHandle, source: &SoundSource) -> Result<(), SoundError> {
    let path = source.path();
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))?;
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    sink.append(decoder);
    sink.detach(); // Non-blocking: sound continues after function returns
    Ok(())
}

/// Creates a player, returning `None` if audio is unavailable.
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
