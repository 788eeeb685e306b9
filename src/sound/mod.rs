//! Sound cues for the countdown overlay.
//!
//! Two cues exist: a "finished" sound played once when the countdown
//! reaches zero, and a "button click" played on every control action.
//! Playback is best effort: a missing file, a missing audio device or a
//! decode failure is logged and the overlay carries on in silence.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │    CuePlayer     │────▶│   AssetSounds    │  Assets/*.wav
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundPlayer    │────▶│   audio thread   │  rodio output stream
//! └──────────────────┘     └──────────────────┘
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{
    default_assets_dir, find_cue, AssetSounds, SoundCue, SoundSource, ASSETS_DIR_NAME,
};

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.calls().clone()
    }

    /// Number of times a source with the given name was played.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.calls().iter().filter(|s| s.name() == name).count()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<SoundSource>> {
        self.play_calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.calls().push(source.clone());
        Ok(())
    }
}

// ============================================================================
// CuePlayer
// ============================================================================

/// Plays sound cues, swallowing every failure.
#[derive(Clone, Default)]
pub struct CuePlayer {
    player: Option<Arc<dyn SoundPlayer + Send + Sync>>,
    sounds: AssetSounds,
}

impl std::fmt::Debug for CuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CuePlayer")
            .field("has_player", &self.player.is_some())
            .field("sounds", &self.sounds)
            .finish()
    }
}

impl CuePlayer {
    /// Creates a cue player backed by `player`.
    pub fn new(player: Arc<dyn SoundPlayer + Send + Sync>, sounds: AssetSounds) -> Self {
        Self {
            player: Some(player),
            sounds,
        }
    }

    /// Creates a cue player that never makes a sound.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// Returns true if this player never makes a sound.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.player.is_none()
    }

    /// Plays a cue. Never fails; problems are logged.
    pub fn play(&self, cue: SoundCue) {
        let Some(player) = &self.player else {
            return;
        };
        let Some(source) = self.sounds.get(cue) else {
            debug!(cue = cue.name(), "no sound file for cue");
            return;
        };

        if let Err(e) = player.play(source) {
            warn!(cue = cue.name(), "{}", e);
        }
    }
}
