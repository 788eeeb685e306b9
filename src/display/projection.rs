//! Display projection.
//!
//! Turns an engine snapshot into the clock string, the status string and
//! the visual effect. Pure: no state, no clock reads.

use std::time::Duration;

use serde::Serialize;

use crate::engine::Snapshot;
use crate::types::{ClockPrecision, TimerConfig, TimerPhase};

/// Visual treatment of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualEffect {
    /// Fully opaque, no animation
    Steady,
    /// Finished pulse at the given opacity
    Flash { opacity: f32 },
}

/// One projected display state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Clock text, e.g. `04:59.9`
    pub clock: String,
    /// Status text
    pub status: String,
    /// Clock effect
    pub effect: VisualEffect,
}

/// Projects a snapshot into a frame.
///
/// `flash` is the current pulse opacity while the finished flash is live.
pub fn project(
    snapshot: Snapshot,
    config: &TimerConfig,
    precision: ClockPrecision,
    flash: Option<f32>,
) -> Frame {
    let clock = match snapshot.phase {
        TimerPhase::Finished => finished_clock(precision).to_string(),
        _ => format_clock(snapshot.remaining, precision),
    };

    let status = match snapshot.phase {
        TimerPhase::Running | TimerPhase::Paused => config.active_text.clone(),
        TimerPhase::Finished => config.finished_text.clone(),
        TimerPhase::Idle => String::new(),
    };

    let effect = match flash {
        Some(opacity) => VisualEffect::Flash { opacity },
        None => VisualEffect::Steady,
    };

    Frame {
        clock,
        status,
        effect,
    }
}

/// Clock text shown once the countdown has finished.
pub fn finished_clock(precision: ClockPrecision) -> &'static str {
    match precision {
        ClockPrecision::Seconds => "00:00",
        ClockPrecision::Tenths => "00:00.0",
    }
}

/// Formats remaining time as `MM:SS` or `MM:SS.T`.
///
/// Minutes are total minutes and may exceed two digits; tenths truncate.
pub fn format_clock(remaining: Duration, precision: ClockPrecision) -> String {
    let total_secs = remaining.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    match precision {
        ClockPrecision::Seconds => format!("{:02}:{:02}", minutes, seconds),
        ClockPrecision::Tenths => {
            let tenths = remaining.subsec_millis() / 100;
            format!("{:02}:{:02}.{}", minutes, seconds, tenths)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
