//! Settings form and its validation.
//!
//! The form holds raw text exactly as the user typed it. Validation turns
//! it into a [`TimerConfig`]; the engine never sees unvalidated input.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{defaults, ElementLayout, Layout, TimerConfig};

/// Reasons the settings form is rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid number of minutes (0 or greater).")]
    Minutes,
    #[error("Please enter a valid number of seconds (0-59).")]
    Seconds,
    #[error("Timer duration must be greater than 0.")]
    ZeroDuration,
    #[error("Please enter a valid number for Clock X position.")]
    ClockX,
    #[error("Please enter a valid number for Clock Y position.")]
    ClockY,
    #[error("Please enter a valid font size for Clock (greater than 0).")]
    ClockFontSize,
    #[error("Please enter a valid number for Text X position.")]
    TextX,
    #[error("Please enter a valid number for Text Y position.")]
    TextY,
    #[error("Please enter a valid font size for Text (greater than 0).")]
    TextFontSize,
}

/// An editable field of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Minutes,
    Seconds,
    ActiveText,
    FinishedText,
    ClockX,
    ClockY,
    ClockFontSize,
    TextX,
    TextY,
    TextFontSize,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [FormField; 10] = [
        FormField::Minutes,
        FormField::Seconds,
        FormField::ActiveText,
        FormField::FinishedText,
        FormField::ClockX,
        FormField::ClockY,
        FormField::ClockFontSize,
        FormField::TextX,
        FormField::TextY,
        FormField::TextFontSize,
    ];

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Minutes => "minutes",
            FormField::Seconds => "seconds",
            FormField::ActiveText => "active",
            FormField::FinishedText => "finished",
            FormField::ClockX => "clockx",
            FormField::ClockY => "clocky",
            FormField::ClockFontSize => "clockfontsize",
            FormField::TextX => "textx",
            FormField::TextY => "texty",
            FormField::TextFontSize => "textfontsize",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == lower)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Raw text of the settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub minutes: String,
    pub seconds: String,
    pub active_text: String,
    pub finished_text: String,
    pub clock_x: String,
    pub clock_y: String,
    pub clock_font_size: String,
    pub text_x: String,
    pub text_y: String,
    pub text_font_size: String,
}

impl SettingsForm {
    /// Pre-fills the form from a config.
    pub fn from_config(config: &TimerConfig) -> Self {
        let clock = &config.layout.clock;
        let text = &config.layout.text;
        Self {
            minutes: config.minutes().to_string(),
            seconds: config.seconds().to_string(),
            active_text: config.active_text.clone(),
            finished_text: config.finished_text.clone(),
            clock_x: clock.x.to_string(),
            clock_y: clock.y.to_string(),
            clock_font_size: clock.font_size.to_string(),
            text_x: text.x.to_string(),
            text_y: text.y.to_string(),
            text_font_size: text.font_size.to_string(),
        }
    }

    /// Returns the raw text of a field.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Minutes => &self.minutes,
            FormField::Seconds => &self.seconds,
            FormField::ActiveText => &self.active_text,
            FormField::FinishedText => &self.finished_text,
            FormField::ClockX => &self.clock_x,
            FormField::ClockY => &self.clock_y,
            FormField::ClockFontSize => &self.clock_font_size,
            FormField::TextX => &self.text_x,
            FormField::TextY => &self.text_y,
            FormField::TextFontSize => &self.text_font_size,
        }
    }

    /// Replaces the raw text of a field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Minutes => &mut self.minutes,
            FormField::Seconds => &mut self.seconds,
            FormField::ActiveText => &mut self.active_text,
            FormField::FinishedText => &mut self.finished_text,
            FormField::ClockX => &mut self.clock_x,
            FormField::ClockY => &mut self.clock_y,
            FormField::ClockFontSize => &mut self.clock_font_size,
            FormField::TextX => &mut self.text_x,
            FormField::TextY => &mut self.text_y,
            FormField::TextFontSize => &mut self.text_font_size,
        };
        *slot = value.into();
    }

    /// Validates every field and builds the config.
    ///
    /// Fields are checked in form order and the first failure is returned.
    /// Blank status texts fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first invalid field.
    pub fn validate(&self) -> Result<TimerConfig, ValidationError> {
        let minutes: u64 = self
            .minutes
            .trim()
            .parse()
            .map_err(|_| ValidationError::Minutes)?;
        let seconds: u64 = self
            .seconds
            .trim()
            .parse()
            .ok()
            .filter(|s| *s <= 59)
            .ok_or(ValidationError::Seconds)?;
        if minutes == 0 && seconds == 0 {
            return Err(ValidationError::ZeroDuration);
        }

        let clock = ElementLayout {
            x: parse_number(&self.clock_x).ok_or(ValidationError::ClockX)?,
            y: parse_number(&self.clock_y).ok_or(ValidationError::ClockY)?,
            font_size: parse_font_size(&self.clock_font_size)
                .ok_or(ValidationError::ClockFontSize)?,
        };
        let text = ElementLayout {
            x: parse_number(&self.text_x).ok_or(ValidationError::TextX)?,
            y: parse_number(&self.text_y).ok_or(ValidationError::TextY)?,
            font_size: parse_font_size(&self.text_font_size)
                .ok_or(ValidationError::TextFontSize)?,
        };

        Ok(TimerConfig {
            active_text: text_or_default(&self.active_text, defaults::ACTIVE_TEXT),
            finished_text: text_or_default(&self.finished_text, defaults::FINISHED_TEXT),
            layout: Layout { clock, text },
            ..TimerConfig::default()
        }
        .with_minutes_seconds(minutes, seconds))
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_font_size(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|n| *n > 0.0)
}

fn text_or_default(raw: &str, default: &str) -> String {
    if raw.trim().is_empty() {
        default.to_string()
    } else {
        raw.to_string()
    }
}
