//! CLI module for stream-countdown.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `input`: The stdin control driver
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod input;

pub use commands::{Cli, Commands, ConfigCommand, OutputFormat, RunArgs};
pub use display::Display;
pub use input::{drive, InputCommand, InputError};
