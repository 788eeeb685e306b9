//! Display utilities for the stream-countdown CLI.
//!
//! Interactive feedback goes to stderr so stdout carries only frames.
//! This module provides formatted output for:
//! - Error messages
//! - The settings form with button states
//! - Command help
//! - Config file subcommands

use std::path::Path;

use crate::control::{ButtonStates, FormField, SettingsForm};
use crate::types::TimerPhase;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows the settings form and which buttons are available.
    pub fn show_form(form: &SettingsForm, phase: TimerPhase) {
        eprint!("{}", Self::format_form(form, phase));
    }

    /// Shows the stdin command reference.
    pub fn show_help() {
        eprint!("{}", Self::format_help());
    }

    /// Shows the effective config file.
    pub fn show_config(path: &Path, text: &str) {
        println!("# {}", path.display());
        print!("{}", text);
    }

    /// Shows a success message for `config init`.
    pub fn show_config_written(path: &Path) {
        println!("* Wrote default config to {}", path.display());
    }

    fn format_form(form: &SettingsForm, phase: TimerPhase) -> String {
        let buttons = ButtonStates::for_phase(phase);
        let mut out = format!("Timer: {}\n", phase);
        for field in FormField::ALL {
            out.push_str(&format!("  {:<14}{}\n", field, form.get(field)));
        }

        let mut available = Vec::new();
        if buttons.start_enabled {
            available.push("start");
        }
        if buttons.pause_enabled {
            available.push(if phase == TimerPhase::Paused {
                "continue"
            } else {
                "pause"
            });
        }
        if buttons.stop_enabled {
            available.push("stop");
        }
        if buttons.restart_enabled {
            available.push("restart");
        }
        available.extend(["apply", "close"]);
        out.push_str(&format!("Commands: {}\n", available.join(", ")));
        out
    }

    fn format_help() -> String {
        let fields: Vec<&str> = FormField::ALL.iter().map(|f| f.as_str()).collect();
        format!(
            "Commands:\n\
             \x20 start               start, or continue when paused\n\
             \x20 pause | continue    toggle pause\n\
             \x20 stop                stop the countdown\n\
             \x20 restart             start again from the full duration\n\
             \x20 set <field> <value> edit a setting\n\
             \x20 apply               apply edited settings\n\
             \x20 show                show settings\n\
             \x20 close | quit        apply settings and exit\n\
             Fields: {}\n",
            fields.join(", ")
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
