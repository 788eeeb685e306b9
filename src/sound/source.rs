//! Sound cue assets.
//!
//! Cues are plain files in an assets directory. A missing file leaves the
//! cue silent.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::SoundError;

/// Name of the assets directory next to the executable.
pub const ASSETS_DIR_NAME: &str = "Assets";

/// A sound file to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSource {
    name: String,
    path: PathBuf,
}

impl SoundSource {
    /// Creates a sound source. The path is not checked.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Returns the name of the sound.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The sound cues the overlay plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// The countdown reached zero
    Finished,
    /// A control surface button was pressed
    ButtonClick,
}

impl SoundCue {
    /// File name of the cue inside the assets directory.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundCue::Finished => "timer_finished.wav",
            SoundCue::ButtonClick => "button1.wav",
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Finished => "finished",
            SoundCue::ButtonClick => "button_click",
        }
    }
}

/// Returns `Assets/` next to the executable, if the executable path is known.
#[must_use]
pub fn default_assets_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ASSETS_DIR_NAME)))
}

/// Finds the file for a cue in `dir`.
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` if the file does not exist.
pub fn find_cue(dir: &Path, cue: SoundCue) -> Result<SoundSource, SoundError> {
    let path = dir.join(cue.file_name());
    if path.is_file() {
        Ok(SoundSource::new(cue.name(), path))
    } else {
        Err(SoundError::FileNotFound(path.display().to_string()))
    }
}

/// The resolved cue files. A `None` entry plays nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSounds {
    finished: Option<SoundSource>,
    click: Option<SoundSource>,
}

impl AssetSounds {
    /// Resolves every cue in `dir`, logging the ones that are missing.
    #[must_use]
    pub fn discover(dir: &Path) -> Self {
        let resolve = |cue| match find_cue(dir, cue) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!(cue = cue.name(), "{}", e);
                None
            }
        };

        Self {
            finished: resolve(SoundCue::Finished),
            click: resolve(SoundCue::ButtonClick),
        }
    }

    /// Builds the table from explicit sources.
    #[must_use]
    pub fn new(finished: Option<SoundSource>, click: Option<SoundSource>) -> Self {
        Self { finished, click }
    }

    /// Returns the source for a cue, if one was found.
    #[must_use]
    pub fn get(&self, cue: SoundCue) -> Option<&SoundSource> {
        match cue {
            SoundCue::Finished => self.finished.as_ref(),
            SoundCue::ButtonClick => self.click.as_ref(),
        }
    }
}
