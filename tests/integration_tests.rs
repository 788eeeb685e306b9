//! Integration tests for the countdown engine, tick scheduler and display
//! projection working together.
//!
//! Covers:
//! - Sampling right after start
//! - Pause/continue without elapsed time
//! - Duration changes picked up on restart
//! - Duplicate starts
//! - Natural completion and the finished notification
//! - Status text sequences

use std::time::Duration;

use tokio::sync::mpsc;

use stream_countdown::display::{project, Frame};
use stream_countdown::engine::{
    CountdownEngine, EngineEvent, ManualClock, TickOutcome, TickScheduler,
};
use stream_countdown::types::{ClockPrecision, TimerConfig, TimerPhase};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_engine(secs: u64) -> (CountdownEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let engine = CountdownEngine::new(Duration::from_secs(secs), clock.clone());
    (engine, clock)
}

fn frame(engine: &CountdownEngine<ManualClock>, config: &TimerConfig) -> Frame {
    project(engine.sample(), config, ClockPrecision::Tenths, None)
}

/// Advances the clock in 100 ms ticks and collects the outcomes.
fn run_ticks(
    engine: &mut CountdownEngine<ManualClock>,
    clock: &ManualClock,
    ticks: usize,
) -> Vec<TickOutcome> {
    let scheduler = TickScheduler::default();
    (0..ticks)
        .map(|_| {
            clock.advance(scheduler.period());
            scheduler.on_tick(engine)
        })
        .collect()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_sample_right_after_start_is_full_duration() {
    let (mut engine, _clock) = create_engine(90);

    engine.start();

    assert_eq!(engine.remaining(), Duration::from_secs(90));
    assert_eq!(frame(&engine, &TimerConfig::default()).clock, "01:30.0");
}

#[test]
fn test_pause_then_continue_without_elapsed_time() {
    let (mut engine, clock) = create_engine(60);
    engine.start();
    clock.advance(Duration::from_millis(12_345));

    engine.pause();
    let paused = engine.remaining();
    engine.start();

    assert_eq!(engine.remaining(), paused);
    assert_eq!(engine.phase(), TimerPhase::Running);
}

#[test]
fn test_paused_time_does_not_count() {
    let (mut engine, clock) = create_engine(60);
    engine.start();
    clock.advance(Duration::from_secs(10));
    engine.pause();

    clock.advance(Duration::from_secs(3600));
    engine.start();
    clock.advance(Duration::from_secs(5));

    assert_eq!(engine.remaining(), Duration::from_secs(45));
}

#[test]
fn test_restart_uses_new_duration() {
    let (mut engine, clock) = create_engine(60);
    engine.start();
    clock.advance(Duration::from_secs(20));
    engine.pause();

    engine.set_duration(Duration::from_secs(15));
    engine.restart();

    assert_eq!(engine.remaining(), Duration::from_secs(15));
    assert_eq!(engine.configured_duration(), Duration::from_secs(15));
}

#[test]
fn test_duplicate_start_keeps_end_time() {
    let (mut engine, clock) = create_engine(60);
    engine.start();
    let end_time = engine.end_time();

    clock.advance(Duration::from_secs(2));
    assert!(!engine.start());

    assert_eq!(engine.end_time(), end_time);
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_completion_fires_once() {
    let (mut engine, clock) = create_engine(1);
    let mut events = engine.subscribe();
    engine.start();

    let outcomes = run_ticks(&mut engine, &clock, 30);

    let finished = outcomes
        .iter()
        .filter(|o| **o == TickOutcome::JustFinished)
        .count();
    assert_eq!(finished, 1);
    assert_eq!(outcomes[9], TickOutcome::JustFinished);
    assert_eq!(engine.phase(), TimerPhase::Finished);

    let just_finished = drain(&mut events)
        .into_iter()
        .filter(|e| *e == EngineEvent::JustFinished)
        .count();
    assert_eq!(just_finished, 1);
}

#[test]
fn test_stop_after_finish_does_not_refire() {
    let (mut engine, clock) = create_engine(1);
    let mut events = engine.subscribe();
    engine.start();
    run_ticks(&mut engine, &clock, 15);
    drain(&mut events);

    engine.stop();
    run_ticks(&mut engine, &clock, 15);

    assert!(drain(&mut events).is_empty());
}

#[test]
fn test_each_run_finishes_once() {
    let (mut engine, clock) = create_engine(1);
    let mut events = engine.subscribe();

    for _ in 0..3 {
        engine.start();
        run_ticks(&mut engine, &clock, 12);
    }

    let just_finished = drain(&mut events)
        .into_iter()
        .filter(|e| *e == EngineEvent::JustFinished)
        .count();
    assert_eq!(just_finished, 3);
}

#[test]
fn test_late_tick_still_finishes() {
    let (mut engine, clock) = create_engine(1);
    engine.start();

    clock.advance(Duration::from_secs(30));
    let outcome = TickScheduler::default().on_tick(&mut engine);

    assert_eq!(outcome, TickOutcome::JustFinished);
    assert_eq!(engine.remaining(), Duration::ZERO);
}

// ============================================================================
// Status Sequences
// ============================================================================

#[test]
fn test_status_active_then_finished() {
    let config = TimerConfig::default().with_texts("Live soon", "We're live!");
    let (mut engine, clock) = create_engine(1);
    engine.start();

    let mut statuses = vec![frame(&engine, &config).status];
    for _ in 0..12 {
        run_ticks(&mut engine, &clock, 1);
        let status = frame(&engine, &config).status;
        if statuses.last() != Some(&status) {
            statuses.push(status);
        }
    }

    assert_eq!(statuses, vec!["Live soon", "We're live!"]);
    assert_eq!(frame(&engine, &config).clock, "00:00.0");
}

#[test]
fn test_stop_at_two_seconds_clears_status() {
    let config = TimerConfig::default();
    let (mut engine, clock) = create_engine(5);
    engine.start();
    run_ticks(&mut engine, &clock, 30);
    assert_eq!(engine.remaining(), Duration::from_secs(2));

    engine.stop();

    let frame = frame(&engine, &config);
    assert_eq!(frame.status, "");
    assert_eq!(engine.phase(), TimerPhase::Idle);
}

#[test]
fn test_seconds_precision_clock() {
    let (mut engine, clock) = create_engine(65);
    engine.start();
    clock.advance(Duration::from_millis(500));

    let frame = project(
        engine.sample(),
        &TimerConfig::default(),
        ClockPrecision::Seconds,
        None,
    );

    assert_eq!(frame.clock, "01:04");
}
