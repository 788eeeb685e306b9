//! Periodic tick driver.
//!
//! The scheduler samples the engine at a fixed cadence and decides when a
//! running countdown has just completed. It holds no timing state of its
//! own; every tick recomputes remaining time from the engine's end time.

use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::debug;

use super::clock::Clock;
use super::countdown::CountdownEngine;
use crate::types::defaults;

/// What a single tick decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing to update
    Quiet,
    /// Still counting down
    Remaining(Duration),
    /// The countdown reached zero on this tick
    JustFinished,
}

/// Fixed-cadence tick driver for the countdown engine.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    period: Duration,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(defaults::TICK_INTERVAL)
    }
}

impl TickScheduler {
    /// Creates a scheduler with the given tick period.
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Returns the tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Builds the interval that drives [`TickScheduler::on_tick`].
    ///
    /// Late ticks are skipped rather than bursted.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Samples the engine once.
    ///
    /// The clock is read a single time, so the completion check and the
    /// reported remaining time always agree.
    pub fn on_tick<C: Clock>(&self, engine: &mut CountdownEngine<C>) -> TickOutcome {
        if !engine.phase().is_running() {
            return TickOutcome::Quiet;
        }

        let now = engine.now();
        if engine.complete_at(now) {
            debug!("countdown reached zero");
            return TickOutcome::JustFinished;
        }

        TickOutcome::Remaining(engine.remaining_at(now))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    use crate::engine::clock::{ManualClock, SystemClock};
    use crate::engine::countdown::EngineEvent;
    use crate::types::TimerPhase;

    fn create_engine(secs: u64) -> (CountdownEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = CountdownEngine::new(Duration::from_secs(secs), clock.clone());
        (engine, clock)
    }

    /// Clock that moves forward by `step` after every reading.
    #[derive(Clone)]
    struct SteppingClock {
        inner: ManualClock,
        step: Duration,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> Instant {
            let now = self.inner.now();
            self.inner.advance(self.step);
            now
        }
    }

    mod on_tick_tests {
        use super::*;

        #[test]
        fn test_idle_is_quiet() {
            let (mut engine, _clock) = create_engine(5);
            assert_eq!(TickScheduler::default().on_tick(&mut engine), TickOutcome::Quiet);
        }

        #[test]
        fn test_paused_is_quiet() {
            let (mut engine, clock) = create_engine(5);
            engine.start();
            clock.advance(Duration::from_secs(1));
            engine.pause();

            assert_eq!(TickScheduler::default().on_tick(&mut engine), TickOutcome::Quiet);
        }

        #[test]
        fn test_running_reports_remaining() {
            let (mut engine, clock) = create_engine(5);
            engine.start();
            clock.advance(Duration::from_millis(1_250));

            assert_eq!(
                TickScheduler::default().on_tick(&mut engine),
                TickOutcome::Remaining(Duration::from_millis(3_750))
            );
        }

        #[test]
        fn test_reaching_zero_finishes_once() {
            let scheduler = TickScheduler::default();
            let (mut engine, clock) = create_engine(3);
            let mut rx = engine.subscribe();
            engine.start();

            let mut finished_ticks = 0;
            for _ in 0..50 {
                clock.advance(scheduler.period());
                if scheduler.on_tick(&mut engine) == TickOutcome::JustFinished {
                    finished_ticks += 1;
                }
            }

            assert_eq!(finished_ticks, 1);
            assert_eq!(engine.phase(), TimerPhase::Finished);

            let mut just_finished = 0;
            while let Ok(event) = rx.try_recv() {
                if event == EngineEvent::JustFinished {
                    just_finished += 1;
                }
            }
            assert_eq!(just_finished, 1);
        }

        #[test]
        fn test_missed_ticks_do_not_drift() {
            let scheduler = TickScheduler::default();
            let (mut engine, clock) = create_engine(60);
            engine.start();

            // One tick lands after a long stall, the next after a repeat reading
            clock.advance(Duration::from_millis(7_430));
            assert_eq!(
                scheduler.on_tick(&mut engine),
                TickOutcome::Remaining(Duration::from_millis(52_570))
            );
            assert_eq!(
                scheduler.on_tick(&mut engine),
                TickOutcome::Remaining(Duration::from_millis(52_570))
            );
        }

        #[test]
        fn test_tick_reads_clock_once() {
            let inner = ManualClock::new();
            let clock = SteppingClock {
                inner: inner.clone(),
                step: Duration::from_millis(10),
            };
            let mut engine = CountdownEngine::new(Duration::from_secs(1), clock);
            engine.start();
            let end_time = engine.end_time().unwrap();

            // The tick's reading lands 5 ms short of the end; a second
            // reading would already be past it
            inner.set(end_time - Duration::from_millis(5));
            assert_eq!(
                TickScheduler::default().on_tick(&mut engine),
                TickOutcome::Remaining(Duration::from_millis(5))
            );

            // The next tick reads past the end and finishes
            assert_eq!(
                TickScheduler::default().on_tick(&mut engine),
                TickOutcome::JustFinished
            );
        }

        #[test]
        fn test_overshoot_finishes_immediately() {
            let (mut engine, clock) = create_engine(2);
            engine.start();
            clock.advance(Duration::from_secs(3600));

            assert_eq!(
                TickScheduler::default().on_tick(&mut engine),
                TickOutcome::JustFinished
            );
        }
    }

    mod ticker_tests {
        use super::*;

        #[test]
        fn test_default_period() {
            assert_eq!(TickScheduler::default().period(), Duration::from_millis(100));
        }

        #[tokio::test(start_paused = true)]
        async fn test_ticker_drives_countdown_to_completion() {
            let scheduler = TickScheduler::default();
            let mut engine = CountdownEngine::new(Duration::from_secs(1), SystemClock);
            let mut ticker = scheduler.ticker();
            engine.start();

            let mut remaining_ticks = 0;
            loop {
                ticker.tick().await;
                match scheduler.on_tick(&mut engine) {
                    TickOutcome::Remaining(_) => remaining_ticks += 1,
                    TickOutcome::JustFinished => break,
                    TickOutcome::Quiet => panic!("engine went quiet before finishing"),
                }
            }

            assert!(
                (9..=11).contains(&remaining_ticks),
                "Expected ~10 ticks, got {}",
                remaining_ticks
            );
            assert_eq!(engine.phase(), TimerPhase::Finished);
        }
    }
}
