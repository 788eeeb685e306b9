//! Line-oriented control surface on stdin.
//!
//! Each line is one command. The driver owns the [`ControlSurface`],
//! follows engine events to keep button states current and reports
//! rejected input on stderr.

use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use super::display::Display;
use crate::control::{Button, ControlError, ControlSurface, FormField};
use crate::engine::EngineEvent;
use crate::types::TimerPhase;

/// Errors for lines that are not valid commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),
    #[error("usage: set <field> <value>")]
    MissingField,
    #[error("{0}")]
    UnknownField(String),
}

/// A parsed stdin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Start,
    Pause,
    Stop,
    Restart,
    Apply,
    Close,
    Set(FormField, String),
    Show,
    Help,
}

impl InputCommand {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the line is not a known command.
    pub fn parse_line(line: &str) -> Result<Option<Self>, InputError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }

    /// The button this command presses in the given phase.
    pub fn button(&self, phase: TimerPhase) -> Option<Button> {
        match self {
            InputCommand::Start if phase == TimerPhase::Paused => Some(Button::PauseToggle),
            InputCommand::Start => Some(Button::Start),
            InputCommand::Pause => Some(Button::PauseToggle),
            InputCommand::Stop => Some(Button::Stop),
            InputCommand::Restart => Some(Button::Restart),
            InputCommand::Apply => Some(Button::Apply),
            InputCommand::Close => Some(Button::Close),
            InputCommand::Set(..) | InputCommand::Show | InputCommand::Help => None,
        }
    }
}

impl FromStr for InputCommand {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(s.trim());

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => InputCommand::Start,
            "pause" | "continue" | "resume" => InputCommand::Pause,
            "stop" => InputCommand::Stop,
            "restart" => InputCommand::Restart,
            "apply" => InputCommand::Apply,
            "close" | "quit" | "exit" => InputCommand::Close,
            "show" => InputCommand::Show,
            "help" | "?" => InputCommand::Help,
            "set" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(InputError::MissingField);
                }
                let field = field.parse().map_err(InputError::UnknownField)?;
                InputCommand::Set(field, value.to_string())
            }
            other => return Err(InputError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Splits off the first whitespace-separated word; the rest is trimmed.
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

/// Handles one line. Returns false once input should stop.
pub fn handle_line(surface: &mut ControlSurface, line: &str) -> bool {
    let command = match InputCommand::parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            Display::show_error(&e.to_string());
            return true;
        }
    };

    match command {
        InputCommand::Set(field, value) => {
            surface.form_mut().set(field, value);
            true
        }
        InputCommand::Show => {
            Display::show_form(surface.form(), surface.phase());
            true
        }
        InputCommand::Help => {
            Display::show_help();
            true
        }
        command => {
            let Some(button) = command.button(surface.phase()) else {
                return true;
            };
            match surface.press(button) {
                Ok(Some(action)) => debug!(?button, ?action, "forwarded"),
                Ok(None) => Display::show_error(&format!(
                    "'{}' is not available while the timer is {}",
                    line.trim(),
                    surface.phase()
                )),
                Err(ControlError::Disconnected) => return false,
                Err(e) => Display::show_error(&e.to_string()),
            }
            button != Button::Close
        }
    }
}

/// Reads commands until EOF or `close`, keeping the surface in sync with
/// engine events.
///
/// Dropping the surface on return closes the control channel.
///
/// # Errors
///
/// Returns an error if reading input fails.
pub async fn drive<R>(
    reader: R,
    mut surface: ControlSurface,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => surface.observe(event),
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read control input")? else {
                    debug!("control input closed");
                    break;
                };
                if !handle_line(&mut surface, &line) {
                    break;
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
