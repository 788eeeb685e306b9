//! stream-countdown library
//!
//! This library provides the core functionality for the countdown overlay.
//! It includes:
//! - Countdown engine with a pluggable clock and a 100 ms tick scheduler
//! - Display projection, the finished flash and frame presenters
//! - Settings validation and the control surface
//! - Key=value config persistence
//! - Sound cues for button clicks and completion
//! - The overlay application loop and CLI

pub mod app;
pub mod cli;
pub mod config;
pub mod control;
pub mod display;
pub mod engine;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{ClockPrecision, ElementLayout, Layout, TimerAction, TimerConfig, TimerPhase};

pub use app::OverlayApp;

pub use engine::{
    Clock, CountdownEngine, EngineEvent, ManualClock, Snapshot, SystemClock, TickOutcome,
    TickScheduler,
};

pub use display::{
    format_clock, project, FlashEffect, Frame, JsonPresenter, Presenter, RecordingPresenter,
    TerminalPresenter, VisualEffect,
};

pub use control::{
    Button, ButtonStates, ControlError, ControlMessage, ControlRequest, ControlSurface,
    FormField, SettingsForm, ValidationError,
};

pub use config::{ConfigError, ConfigStore};

// Re-export sound types
pub use sound::{
    AssetSounds, CuePlayer, MockSoundPlayer, RodioSoundPlayer, SoundCue, SoundError, SoundPlayer,
    SoundSource,
};
