//! The settings/control surface.
//!
//! Turns button presses into at most one [`TimerAction`] each, validating
//! the settings form first whenever the action could (re)start the timer.
//! Talks to the application only through a message channel and learns
//! about phase changes from engine events.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use super::validation::{SettingsForm, ValidationError};
use crate::engine::EngineEvent;
use crate::sound::{CuePlayer, SoundCue};
use crate::types::{TimerAction, TimerConfig, TimerPhase};

// ============================================================================
// Messages
// ============================================================================

/// A validated request for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRequest {
    /// What to do with the timer
    pub action: TimerAction,
    /// Settings to apply before the action
    pub config: TimerConfig,
}

/// Messages from the control surface to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// Apply settings and run an action
    Request(ControlRequest),
    /// Close the overlay
    Close,
}

/// Errors returned by [`ControlSurface::press`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    /// The settings form was rejected; nothing was forwarded
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The application is no longer listening
    #[error("the overlay is no longer running")]
    Disconnected,
}

// ============================================================================
// Buttons
// ============================================================================

/// Buttons on the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Start a fresh run
    Start,
    /// Pause, or continue when paused
    PauseToggle,
    Stop,
    Restart,
    /// Apply edited settings without touching the timer
    Apply,
    /// Apply edited settings, then shut the overlay down.
    ///
    /// With a single control surface there is no separate settings window,
    /// so closing the settings and quitting the overlay are one button. The
    /// close is sent even when the settings fail validation.
    Close,
}

/// Enabled state and labels of the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStates {
    pub start_enabled: bool,
    pub pause_label: &'static str,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
    pub restart_enabled: bool,
}

impl ButtonStates {
    /// Button states for a timer phase.
    pub fn for_phase(phase: TimerPhase) -> Self {
        Self {
            start_enabled: !phase.is_in_progress(),
            pause_label: if phase == TimerPhase::Paused {
                "Continue"
            } else {
                "Pause"
            },
            pause_enabled: phase.is_in_progress(),
            stop_enabled: phase.is_in_progress(),
            restart_enabled: true,
        }
    }

    /// Returns true if the button can be pressed.
    pub fn is_enabled(&self, button: Button) -> bool {
        match button {
            Button::Start => self.start_enabled,
            Button::PauseToggle => self.pause_enabled,
            Button::Stop => self.stop_enabled,
            Button::Restart => self.restart_enabled,
            Button::Apply | Button::Close => true,
        }
    }
}

// ============================================================================
// ControlSurface
// ============================================================================

/// Settings panel with timer controls.
pub struct ControlSurface {
    form: SettingsForm,
    /// Last validated settings, sent with every request
    config: TimerConfig,
    phase: TimerPhase,
    cues: CuePlayer,
    tx: mpsc::UnboundedSender<ControlMessage>,
}

impl ControlSurface {
    /// Creates a surface pre-filled from `config`.
    pub fn new(
        config: TimerConfig,
        phase: TimerPhase,
        cues: CuePlayer,
        tx: mpsc::UnboundedSender<ControlMessage>,
    ) -> Self {
        Self {
            form: SettingsForm::from_config(&config),
            config,
            phase,
            cues,
            tx,
        }
    }

    /// The settings form as currently edited.
    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    /// Mutable access to the settings form.
    pub fn form_mut(&mut self) -> &mut SettingsForm {
        &mut self.form
    }

    /// Last validated settings.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Phase as last known to the surface.
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Current button states.
    pub fn buttons(&self) -> ButtonStates {
        ButtonStates::for_phase(self.phase)
    }

    /// Keeps button states in sync with the engine.
    pub fn observe(&mut self, event: EngineEvent) {
        if let EngineEvent::PhaseChanged { new, .. } = event {
            self.phase = new;
        }
    }

    /// Presses a button.
    ///
    /// Returns the forwarded action, or `None` if the button is disabled.
    /// The click cue plays for every enabled button, even when validation
    /// then rejects the form.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Invalid` if the form is rejected and
    /// `ControlError::Disconnected` if the application has gone away.
    pub fn press(&mut self, button: Button) -> Result<Option<TimerAction>, ControlError> {
        if !self.buttons().is_enabled(button) {
            debug!(?button, phase = %self.phase, "button disabled");
            return Ok(None);
        }
        self.cues.play(SoundCue::ButtonClick);

        let action = match button {
            Button::Start => self.submit(TimerAction::Start)?,
            Button::PauseToggle => match self.phase {
                TimerPhase::Running => self.forward(TimerAction::Pause)?,
                _ => self.submit(TimerAction::Start)?,
            },
            Button::Stop => self.forward(TimerAction::Stop)?,
            Button::Restart => self.submit(TimerAction::Restart)?,
            Button::Apply => self.submit(TimerAction::None)?,
            Button::Close => {
                let applied = self.submit(TimerAction::None);
                self.send(ControlMessage::Close)?;
                applied?
            }
        };

        Ok(Some(action))
    }

    /// Validates the form, then forwards the action with the new settings.
    fn submit(&mut self, action: TimerAction) -> Result<TimerAction, ControlError> {
        self.config = self.form.validate()?;
        self.forward(action)
    }

    /// Forwards the action with the last validated settings.
    fn forward(&mut self, action: TimerAction) -> Result<TimerAction, ControlError> {
        self.send(ControlMessage::Request(ControlRequest {
            action,
            config: self.config.clone(),
        }))?;
        self.phase = expected_phase(self.phase, action);
        Ok(action)
    }

    fn send(&self, message: ControlMessage) -> Result<(), ControlError> {
        self.tx.send(message).map_err(|_| ControlError::Disconnected)
    }
}

/// Phase the engine will be in once it has handled `action`.
///
/// Engine events confirm or correct this shortly after.
fn expected_phase(current: TimerPhase, action: TimerAction) -> TimerPhase {
    match (current, action) {
        (_, TimerAction::Start | TimerAction::Restart) => TimerPhase::Running,
        (TimerPhase::Running, TimerAction::Pause) => TimerPhase::Paused,
        (TimerPhase::Running | TimerPhase::Paused, TimerAction::Stop) => TimerPhase::Idle,
        (phase, _) => phase,
    }
}

// ============================================================================
// Tests
// ============================================================================
