//! Core data types for the countdown overlay.
//!
//! This module defines the data structures used for:
//! - Timer phases and control actions
//! - Timer configuration (duration, status texts, layout)
//! - Clock display precision

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

/// Default values shared by the config store, control surface and engine.
pub mod defaults {
    use std::time::Duration;

    /// Default countdown minutes
    pub const MINUTES: u64 = 5;
    /// Default countdown seconds
    pub const SECONDS: u64 = 0;
    /// Status text shown while the timer is running or paused
    pub const ACTIVE_TEXT: &str = "Timer Active";
    /// Status text shown once the countdown has reached zero
    pub const FINISHED_TEXT: &str = "Time's Up!";
    /// Default clock font size
    pub const CLOCK_FONT_SIZE: f64 = 120.0;
    /// Default status text font size
    pub const TEXT_FONT_SIZE: f64 = 36.0;
    /// Interval between scheduler ticks
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
}

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Never started, or stopped before completion
    #[default]
    Idle,
    /// Counting down towards the anchor end time
    Running,
    /// Halted with a remaining-time snapshot
    Paused,
    /// Reached zero by natural completion
    Finished,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        }
    }

    /// Returns true if the countdown is actively running.
    pub fn is_running(&self) -> bool {
        matches!(self, TimerPhase::Running)
    }

    /// Returns true if a run is in progress (running or paused).
    pub fn is_in_progress(&self) -> bool {
        matches!(self, TimerPhase::Running | TimerPhase::Paused)
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerAction
// ============================================================================

/// Action issued by the control surface for a single user gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    /// Apply edited settings without changing the timer phase
    #[default]
    None,
    /// Start a fresh run, or resume a paused one
    Start,
    /// Stop the current run
    Stop,
    /// Pause the running countdown
    Pause,
    /// Stop and start again with the configured duration
    Restart,
}

impl TimerAction {
    /// Returns true if this action changes the timer phase.
    pub fn is_transition(&self) -> bool {
        !matches!(self, TimerAction::None)
    }
}

// ============================================================================
// ClockPrecision
// ============================================================================

/// How many digits the clock shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ClockPrecision {
    /// `MM:SS`
    Seconds,
    /// `MM:SS.T`
    #[default]
    Tenths,
}

// ============================================================================
// Layout
// ============================================================================

/// Position and font size of one displayed element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementLayout {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

impl ElementLayout {
    /// Creates a layout at the origin with the given font size.
    pub fn with_font_size(font_size: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            font_size,
        }
    }
}

/// On-screen layout of the clock and the status text.
///
/// The engine never looks at these values; they are carried from the
/// config store to the presenter untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub clock: ElementLayout,
    pub text: ElementLayout,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            clock: ElementLayout::with_font_size(defaults::CLOCK_FONT_SIZE),
            text: ElementLayout::with_font_size(defaults::TEXT_FONT_SIZE),
        }
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for the countdown overlay.
///
/// The duration is kept as a single normalized value; minutes and seconds
/// only exist at the edit and presentation edges.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerConfig {
    /// Countdown duration
    pub duration: Duration,
    /// Status text while running or paused
    pub active_text: String,
    /// Status text after natural completion
    pub finished_text: String,
    /// Element positions and font sizes
    pub layout: Layout,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(defaults::MINUTES * 60 + defaults::SECONDS),
            active_text: defaults::ACTIVE_TEXT.to_string(),
            finished_text: defaults::FINISHED_TEXT.to_string(),
            layout: Layout::default(),
        }
    }
}

impl TimerConfig {
    /// Sets the duration from minute and second edit fields.
    pub fn with_minutes_seconds(mut self, minutes: u64, seconds: u64) -> Self {
        self.duration = Duration::from_secs(minutes.saturating_mul(60).saturating_add(seconds));
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets both status texts.
    pub fn with_texts(mut self, active: impl Into<String>, finished: impl Into<String>) -> Self {
        self.active_text = active.into();
        self.finished_text = finished.into();
        self
    }

    /// Whole minutes of the configured duration.
    pub fn minutes(&self) -> u64 {
        self.duration.as_secs() / 60
    }

    /// Seconds past the whole minutes (0-59).
    pub fn seconds(&self) -> u64 {
        self.duration.as_secs() % 60
    }
}

// ============================================================================
// Tests
// ============================================================================
