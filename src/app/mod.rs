//! The overlay application.
//!
//! Owns the engine, the tick scheduler, the presenter and the flash state,
//! and drives them from one cooperative loop:
//!
//! ```text
//! ticker ──▶ TickScheduler ──▶ CountdownEngine ──▶ project ──▶ Presenter
//!                                   ▲
//! ControlMessage channel ───────────┘
//! ```

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ConfigStore;
use crate::control::{ControlMessage, ControlRequest};
use crate::display::{project, FlashEffect, Presenter};
use crate::engine::{
    Clock, CountdownEngine, EngineEvent, SystemClock, TickOutcome, TickScheduler,
};
use crate::sound::{CuePlayer, SoundCue};
use crate::types::{ClockPrecision, TimerAction, TimerConfig, TimerPhase};

/// The countdown overlay: engine, display and persistence in one loop.
pub struct OverlayApp<P: Presenter, C: Clock + Clone = SystemClock> {
    clock: C,
    engine: CountdownEngine<C>,
    scheduler: TickScheduler,
    config: TimerConfig,
    store: Option<ConfigStore>,
    presenter: P,
    cues: CuePlayer,
    flash: FlashEffect,
    precision: ClockPrecision,
}

impl<P: Presenter> OverlayApp<P, SystemClock> {
    /// Creates an application on the system clock.
    pub fn with_system_clock(config: TimerConfig, presenter: P) -> Self {
        Self::new(config, presenter, SystemClock)
    }
}

impl<P: Presenter, C: Clock + Clone> OverlayApp<P, C> {
    /// Creates an idle application showing `config`.
    ///
    /// No config store and no sound until configured with the `with_*`
    /// builders.
    pub fn new(config: TimerConfig, presenter: P, clock: C) -> Self {
        Self {
            engine: CountdownEngine::new(config.duration, clock.clone()),
            clock,
            scheduler: TickScheduler::default(),
            config,
            store: None,
            presenter,
            cues: CuePlayer::silent(),
            flash: FlashEffect::default(),
            precision: ClockPrecision::default(),
        }
    }

    /// Persists accepted settings to `store`.
    pub fn with_store(mut self, store: ConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Plays cues through `cues`.
    pub fn with_cues(mut self, cues: CuePlayer) -> Self {
        self.cues = cues;
        self
    }

    /// Formats the clock with `precision`.
    pub fn with_precision(mut self, precision: ClockPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Ticks with `scheduler` instead of the default 100 ms cadence.
    pub fn with_scheduler(mut self, scheduler: TickScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Returns the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the countdown engine.
    pub fn engine(&self) -> &CountdownEngine<C> {
        &self.engine
    }

    /// Returns the settings currently in effect.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the current timer phase.
    pub fn phase(&self) -> TimerPhase {
        self.engine.phase()
    }

    /// Returns true while the finished flash is animating.
    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    /// Subscribes to engine events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EngineEvent> {
        self.engine.subscribe()
    }

    /// Runs until a close message arrives, the channel closes or Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the Ctrl-C handler cannot be installed.
    pub async fn run(&mut self, mut rx: mpsc::UnboundedReceiver<ControlMessage>) -> Result<()> {
        info!(
            duration = ?self.config.duration,
            period = ?self.scheduler.period(),
            "overlay started"
        );
        self.render();

        let mut ticker = self.scheduler.ticker();
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.handle_tick(),
                message = rx.recv() => match message {
                    Some(message) => {
                        if !self.handle_message(message) {
                            break;
                        }
                    }
                    None => {
                        debug!("control channel closed");
                        break;
                    }
                },
                result = &mut ctrl_c => {
                    result.context("Failed to listen for Ctrl-C")?;
                    info!("interrupted");
                    break;
                }
            }
        }

        info!("overlay closed");
        Ok(())
    }

    /// Handles one control message. Returns false once the overlay should close.
    pub fn handle_message(&mut self, message: ControlMessage) -> bool {
        match message {
            ControlMessage::Request(request) => {
                self.apply(request);
                true
            }
            ControlMessage::Close => false,
        }
    }

    /// Applies new settings, then performs the requested action.
    pub fn apply(&mut self, request: ControlRequest) {
        let ControlRequest { action, config } = request;

        self.engine.set_duration(config.duration);
        self.config = config;

        if action.is_transition() {
            self.flash.cancel();
        }

        let changed = match action {
            TimerAction::None => false,
            TimerAction::Start => self.engine.start(),
            TimerAction::Pause => self.engine.pause(),
            TimerAction::Stop => self.engine.stop(),
            TimerAction::Restart => self.engine.restart(),
        };
        debug!(?action, changed, phase = %self.engine.phase(), "control request applied");

        self.save_config();
        self.render();
    }

    /// Runs one scheduler tick and updates the display.
    pub fn handle_tick(&mut self) {
        match self.scheduler.on_tick(&mut self.engine) {
            TickOutcome::Remaining(_) => self.render(),
            TickOutcome::JustFinished => {
                info!("countdown finished");
                self.cues.play(SoundCue::Finished);
                self.flash.start(self.clock.now());
                self.render();
            }
            TickOutcome::Quiet => {
                if self.flash.is_active() {
                    self.render();
                }
            }
        }
    }

    /// Projects the current state and hands it to the presenter.
    pub fn render(&mut self) {
        let opacity = self.flash.opacity(self.clock.now());
        let frame = project(self.engine.sample(), &self.config, self.precision, opacity);

        if let Err(e) = self.presenter.present(&frame, &self.config.layout) {
            warn!("Failed to present frame: {}", e);
        }
    }

    fn save_config(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.config) {
            warn!("{}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{RecordingPresenter, VisualEffect};
    use crate::engine::ManualClock;
    use crate::sound::{AssetSounds, MockSoundPlayer, SoundSource};
    use std::sync::Arc;
    use std::time::Duration;

    fn config(secs: u64) -> TimerConfig {
        TimerConfig::default().with_duration(Duration::from_secs(secs))
    }

    fn request(action: TimerAction, secs: u64) -> ControlRequest {
        ControlRequest {
            action,
            config: config(secs),
        }
    }

    fn create_app(
        secs: u64,
    ) -> (
        OverlayApp<RecordingPresenter, ManualClock>,
        ManualClock,
        Arc<MockSoundPlayer>,
    ) {
        let clock = ManualClock::new();
        let mock = Arc::new(MockSoundPlayer::new());
        let sounds = AssetSounds::new(Some(SoundSource::new("finished", "/f.wav")), None);
        let app = OverlayApp::new(config(secs), RecordingPresenter::new(), clock.clone())
            .with_cues(CuePlayer::new(mock.clone(), sounds));
        (app, clock, mock)
    }

    fn tick_for(
        app: &mut OverlayApp<RecordingPresenter, ManualClock>,
        clock: &ManualClock,
        duration: Duration,
    ) {
        let step = Duration::from_millis(100);
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            clock.advance(step);
            elapsed += step;
            app.handle_tick();
        }
    }

    // ------------------------------------------------------------------------
    // Request Tests
    // ------------------------------------------------------------------------

    mod request_tests {
        use super::*;

        #[test]
        fn test_start_renders_active_text() {
            let (mut app, _clock, _mock) = create_app(3);

            app.apply(request(TimerAction::Start, 3));

            let frame = app.presenter().last().unwrap();
            assert_eq!(frame.clock, "00:03.0");
            assert_eq!(frame.status, "Timer Active");
            assert_eq!(app.phase(), TimerPhase::Running);
        }

        #[test]
        fn test_none_applies_texts_without_transition() {
            let (mut app, _clock, _mock) = create_app(3);
            let mut request = request(TimerAction::None, 3);
            request.config.active_text = "BRB".to_string();

            app.apply(request);

            assert_eq!(app.phase(), TimerPhase::Idle);
            assert_eq!(app.config().active_text, "BRB");
        }

        #[test]
        fn test_duration_change_waits_for_fresh_start() {
            let (mut app, clock, _mock) = create_app(60);
            app.apply(request(TimerAction::Start, 60));
            clock.advance(Duration::from_secs(10));
            app.apply(request(TimerAction::Pause, 60));

            app.apply(request(TimerAction::None, 30));
            assert_eq!(app.engine().remaining(), Duration::from_secs(50));

            app.apply(request(TimerAction::Restart, 30));
            assert_eq!(app.engine().remaining(), Duration::from_secs(30));
        }

        #[test]
        fn test_close_message_stops_loop() {
            let (mut app, _clock, _mock) = create_app(3);
            assert!(app.handle_message(ControlMessage::Request(request(TimerAction::None, 3))));
            assert!(!app.handle_message(ControlMessage::Close));
        }

        #[test]
        fn test_accepted_request_is_saved() {
            let dir = tempfile::tempdir().unwrap();
            let store = ConfigStore::new(dir.path().join("config.txt"));
            let (app, _clock, _mock) = create_app(3);
            let mut app = app.with_store(store.clone());

            app.apply(request(TimerAction::None, 90));

            assert_eq!(store.load().duration, Duration::from_secs(90));
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_status_sequence_to_finish() {
            let (mut app, clock, mock) = create_app(1);
            app.render();
            app.apply(request(TimerAction::Start, 1));

            tick_for(&mut app, &clock, Duration::from_secs(2));

            assert_eq!(
                app.presenter().status_sequence(),
                vec!["", "Timer Active", "Time's Up!"]
            );
            assert_eq!(app.presenter().last().unwrap().clock, "00:00.0");
            assert_eq!(mock.count_named("finished"), 1);
        }

        #[test]
        fn test_finish_starts_flash() {
            let (mut app, clock, _mock) = create_app(1);
            app.apply(request(TimerAction::Start, 1));

            tick_for(&mut app, &clock, Duration::from_millis(1300));

            assert!(app.is_flashing());
            let frame = app.presenter().last().unwrap();
            assert!(matches!(frame.effect, VisualEffect::Flash { .. }));
        }

        #[test]
        fn test_action_cancels_flash() {
            let (mut app, clock, _mock) = create_app(1);
            app.apply(request(TimerAction::Start, 1));
            tick_for(&mut app, &clock, Duration::from_secs(2));

            app.apply(request(TimerAction::Stop, 1));

            assert!(!app.is_flashing());
            let frame = app.presenter().last().unwrap();
            assert_eq!(frame.effect, VisualEffect::Steady);
            // Finished text survives a stop
            assert_eq!(frame.status, "Time's Up!");
        }

        #[test]
        fn test_apply_keeps_flash() {
            let (mut app, clock, _mock) = create_app(1);
            app.apply(request(TimerAction::Start, 1));
            tick_for(&mut app, &clock, Duration::from_secs(2));

            app.apply(request(TimerAction::None, 1));

            assert!(app.is_flashing());
        }

        #[test]
        fn test_stop_before_zero_clears_status() {
            let (mut app, clock, mock) = create_app(5);
            app.apply(request(TimerAction::Start, 5));
            tick_for(&mut app, &clock, Duration::from_secs(3));

            app.apply(request(TimerAction::Stop, 5));
            tick_for(&mut app, &clock, Duration::from_secs(5));

            assert_eq!(app.presenter().last().unwrap().status, "");
            assert_eq!(mock.count_named("finished"), 0);
        }

        #[test]
        fn test_finished_cue_plays_once() {
            let (mut app, clock, mock) = create_app(1);
            app.apply(request(TimerAction::Start, 1));

            tick_for(&mut app, &clock, Duration::from_secs(10));

            assert_eq!(mock.count_named("finished"), 1);
        }
    }

    // ------------------------------------------------------------------------
    // Run Loop Tests
    // ------------------------------------------------------------------------

    mod run_tests {
        use super::*;
        use tokio::time::sleep;

        #[tokio::test(start_paused = true)]
        async fn test_run_until_close() {
            let mut app = OverlayApp::with_system_clock(config(2), RecordingPresenter::new());
            let (tx, rx) = mpsc::unbounded_channel();

            let driver = async move {
                tx.send(ControlMessage::Request(request(TimerAction::Start, 2)))
                    .unwrap();
                sleep(Duration::from_secs(3)).await;
                tx.send(ControlMessage::Close).unwrap();
            };

            let (result, ()) = tokio::join!(app.run(rx), driver);

            assert!(result.is_ok());
            assert_eq!(app.phase(), TimerPhase::Finished);
            assert_eq!(
                app.presenter().status_sequence(),
                vec!["", "Timer Active", "Time's Up!"]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_with_custom_scheduler() {
            let mut app = OverlayApp::with_system_clock(config(1), RecordingPresenter::new())
                .with_scheduler(TickScheduler::new(Duration::from_millis(500)));
            let (tx, rx) = mpsc::unbounded_channel();

            let driver = async move {
                tx.send(ControlMessage::Request(request(TimerAction::Start, 1)))
                    .unwrap();
                sleep(Duration::from_millis(1_600)).await;
                tx.send(ControlMessage::Close).unwrap();
            };

            let (result, ()) = tokio::join!(app.run(rx), driver);

            assert!(result.is_ok());
            assert_eq!(app.phase(), TimerPhase::Finished);
            // Initial frame, the start, then only a handful of 500 ms ticks
            assert!(app.presenter().frames().len() <= 8);
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_ends_when_channel_closes() {
            let mut app = OverlayApp::with_system_clock(config(60), RecordingPresenter::new());
            let (tx, rx) = mpsc::unbounded_channel::<ControlMessage>();
            drop(tx);

            app.run(rx).await.unwrap();

            assert_eq!(app.presenter().frames().len(), 1);
            assert_eq!(app.presenter().last().unwrap().clock, "01:00.0");
        }
    }
}
