//! Countdown engine for the overlay timer.
//!
//! The engine owns the timer phase and computes remaining time from an
//! absolute anchor end time. Nothing is decremented per tick, so scheduler
//! jitter, missed ticks or a sleeping host never skew the display.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use crate::types::TimerPhase;

/// Longest run the engine will anchor. Longer durations are clamped.
pub const MAX_RUN: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// ============================================================================
// EngineEvent
// ============================================================================

/// Notifications published to every engine subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The phase changed
    PhaseChanged {
        /// Phase before the transition
        old: TimerPhase,
        /// Phase after the transition
        new: TimerPhase,
    },
    /// The countdown reached zero. Fires once per run.
    JustFinished,
}

// ============================================================================
// Snapshot
// ============================================================================

/// A sampled view of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase
    pub phase: TimerPhase,
    /// Time left, never negative
    pub remaining: Duration,
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// Phase together with the data that is only valid in that phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running { end_time: Instant },
    Paused { remaining: Duration },
    Finished,
}

impl State {
    fn phase(&self) -> TimerPhase {
        match self {
            State::Idle => TimerPhase::Idle,
            State::Running { .. } => TimerPhase::Running,
            State::Paused { .. } => TimerPhase::Paused,
            State::Finished => TimerPhase::Finished,
        }
    }
}

/// Countdown state machine with phases Idle, Running, Paused and Finished.
///
/// Transitions whose precondition does not hold are ignored and reported
/// by returning `false`.
pub struct CountdownEngine<C: Clock = SystemClock> {
    clock: C,
    state: State,
    /// Duration snapshot taken when the current run was started fresh
    configured: Duration,
    /// Latest duration handed over from the config, used by the next fresh start
    pending: Duration,
    subscribers: Vec<mpsc::UnboundedSender<EngineEvent>>,
}

impl CountdownEngine<SystemClock> {
    /// Creates an idle engine driven by the system clock.
    pub fn with_system_clock(duration: Duration) -> Self {
        Self::new(duration, SystemClock)
    }
}

impl<C: Clock> CountdownEngine<C> {
    /// Creates an idle engine with the given configured duration.
    pub fn new(duration: Duration, clock: C) -> Self {
        let duration = duration.min(MAX_RUN);
        Self {
            clock,
            state: State::Idle,
            configured: duration,
            pending: duration,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new observer and returns its event stream.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    /// Duration captured at the last fresh start.
    pub fn configured_duration(&self) -> Duration {
        self.configured
    }

    /// Duration the next fresh start will use.
    pub fn pending_duration(&self) -> Duration {
        self.pending
    }

    /// Reads the engine's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Anchor end time, set only while running.
    pub fn end_time(&self) -> Option<Instant> {
        match self.state {
            State::Running { end_time } => Some(end_time),
            _ => None,
        }
    }

    /// Hands over an edited duration without touching the phase.
    ///
    /// A running or paused countdown keeps its snapshot; the new value is
    /// picked up by the next fresh start.
    pub fn set_duration(&mut self, duration: Duration) {
        self.pending = duration.min(MAX_RUN);
    }

    /// Starts a fresh run, or resumes a paused one.
    ///
    /// A second call while already running is a no-op, so a stray duplicate
    /// request never moves the end time.
    pub fn start(&mut self) -> bool {
        let remaining = match self.state {
            State::Running { .. } => {
                debug!("start ignored: already running");
                return false;
            }
            State::Paused { remaining } => remaining,
            State::Idle | State::Finished => {
                self.configured = self.pending;
                self.configured
            }
        };

        let now = self.clock.now();
        let end_time = now.checked_add(remaining).unwrap_or(now);
        self.set_state(State::Running { end_time });
        true
    }

    /// Pauses a running countdown, snapshotting the time left.
    pub fn pause(&mut self) -> bool {
        let State::Running { end_time } = self.state else {
            debug!(phase = %self.phase(), "pause ignored: not running");
            return false;
        };

        let remaining = end_time.saturating_duration_since(self.clock.now());
        self.set_state(State::Paused { remaining });
        true
    }

    /// Stops the countdown.
    ///
    /// Running and paused runs return to Idle. A finished run stays
    /// Finished so its status text survives; Idle is left alone.
    pub fn stop(&mut self) -> bool {
        match self.state {
            State::Running { .. } | State::Paused { .. } => {
                self.set_state(State::Idle);
                true
            }
            State::Idle | State::Finished => false,
        }
    }

    /// Stops and starts again with the pending duration, discarding any
    /// paused remainder.
    pub fn restart(&mut self) -> bool {
        self.stop();
        self.start()
    }

    /// Completes a running countdown whose end time has been reached.
    ///
    /// Performs the stop step followed by the finish step and publishes
    /// [`EngineEvent::JustFinished`]. Returns `false` if the countdown is
    /// not running or still has time left.
    pub fn complete(&mut self) -> bool {
        let now = self.clock.now();
        self.complete_at(now)
    }

    /// Like [`CountdownEngine::complete`], judged against the reading `now`.
    pub fn complete_at(&mut self, now: Instant) -> bool {
        if !self.phase().is_running() || !self.remaining_at(now).is_zero() {
            return false;
        }

        self.stop();
        self.finish();
        true
    }

    /// Marks the halted run as finished by natural completion.
    fn finish(&mut self) {
        debug_assert_eq!(self.state, State::Idle);
        self.set_state(State::Finished);
        self.emit(EngineEvent::JustFinished);
    }

    /// Returns the time left at this instant.
    ///
    /// Idle shows the pending duration, paused shows the snapshot, finished
    /// is zero.
    pub fn remaining(&self) -> Duration {
        self.remaining_at(self.clock.now())
    }

    /// Time left as of the reading `now`.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.state {
            State::Idle => self.pending,
            State::Running { end_time } => end_time.saturating_duration_since(now),
            State::Paused { remaining } => remaining,
            State::Finished => Duration::ZERO,
        }
    }

    /// Samples phase and remaining time together.
    pub fn sample(&self) -> Snapshot {
        Snapshot {
            phase: self.phase(),
            remaining: self.remaining(),
        }
    }

    fn set_state(&mut self, state: State) {
        let old = self.state.phase();
        self.state = state;
        let new = state.phase();

        if old != new {
            debug!(%old, %new, "phase changed");
            self.emit(EngineEvent::PhaseChanged { old, new });
        }
    }

    /// Sends an event to every live subscriber, dropping closed ones.
    fn emit(&mut self, event: EngineEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

// ============================================================================
// Tests
// ============================================================================
