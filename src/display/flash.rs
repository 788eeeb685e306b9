//! Finished-state flash effect.
//!
//! Opacity runs from 1.0 down to 0.3 over half a second, back up over the
//! next half, and loops until cancelled.

use std::time::Duration;

use tokio::time::Instant;

/// Opacity at the top of the pulse.
pub const FLASH_OPACITY_HIGH: f32 = 1.0;
/// Opacity at the bottom of the pulse.
pub const FLASH_OPACITY_LOW: f32 = 0.3;
/// Time for one fade in one direction.
pub const FLASH_HALF_PERIOD: Duration = Duration::from_millis(500);

/// A looping opacity pulse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashEffect {
    started: Option<Instant>,
}

impl FlashEffect {
    /// Starts (or restarts) the pulse at `now`.
    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    /// Cancels the pulse.
    pub fn cancel(&mut self) {
        self.started = None;
    }

    /// Returns true while the pulse is live.
    pub fn is_active(&self) -> bool {
        self.started.is_some()
    }

    /// Current opacity, or `None` when inactive.
    pub fn opacity(&self, now: Instant) -> Option<f32> {
        let started = self.started?;
        let half = FLASH_HALF_PERIOD.as_secs_f32();
        let elapsed = now.saturating_duration_since(started).as_secs_f32();

        // Position within one full down-and-up cycle, 0.0..2.0
        let cycle = (elapsed / half) % 2.0;
        let progress = if cycle <= 1.0 { cycle } else { 2.0 - cycle };

        Some(FLASH_OPACITY_HIGH - (FLASH_OPACITY_HIGH - FLASH_OPACITY_LOW) * progress)
    }
}
