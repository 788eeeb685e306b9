//! Key-value config file.
//!
//! One `key=value` per line, `#` comments, keys matched case-insensitively.
//! Unknown keys and malformed numbers are skipped so that a damaged file
//! still yields a usable config.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::ConfigError;
use crate::types::TimerConfig;

/// File name of the config file.
pub const CONFIG_FILE_NAME: &str = "config.txt";

/// Directory under the platform config dir.
pub const APP_DIR_NAME: &str = "stream-countdown";

// ============================================================================
// Parsing and rendering
// ============================================================================

/// Parses config file text on top of the defaults.
pub fn parse_config(text: &str) -> TimerConfig {
    let mut config = TimerConfig::default();
    let mut minutes = config.minutes();
    let mut seconds = config.seconds();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "countdownminutes" => set_parsed(&mut minutes, &key, value),
            "countdownseconds" => set_parsed(&mut seconds, &key, value),
            "activetext" => config.active_text = value.to_string(),
            "finishedtext" => config.finished_text = value.to_string(),
            "clockx" => set_number(&mut config.layout.clock.x, &key, value),
            "clocky" => set_number(&mut config.layout.clock.y, &key, value),
            "clockfontsize" => set_number(&mut config.layout.clock.font_size, &key, value),
            "textx" => set_number(&mut config.layout.text.x, &key, value),
            "texty" => set_number(&mut config.layout.text.y, &key, value),
            "textfontsize" => set_number(&mut config.layout.text.font_size, &key, value),
            _ => debug!(key = %key, "ignoring unknown config key"),
        }
    }

    if minutes == 0 && seconds == 0 {
        warn!("config duration is zero, keeping the default duration");
    } else {
        config = config.with_minutes_seconds(minutes, seconds);
    }

    config
}

fn set_parsed(target: &mut u64, key: &str, value: &str) {
    match value.parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(key, value, "ignoring malformed config value"),
    }
}

fn set_number(target: &mut f64, key: &str, value: &str) {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => *target = parsed,
        _ => warn!(key, value, "ignoring malformed config value"),
    }
}

/// Renders a config as file text with every key present.
///
/// Numbers always use `.` as the decimal separator.
pub fn render_config(config: &TimerConfig) -> String {
    let clock = &config.layout.clock;
    let text = &config.layout.text;

    let lines = [
        "# RT Event Timer Configuration".to_string(),
        "# Timer Settings".to_string(),
        format!("CountdownMinutes={}", config.minutes()),
        format!("CountdownSeconds={}", config.seconds()),
        format!("ActiveText={}", config.active_text),
        format!("FinishedText={}", config.finished_text),
        String::new(),
        "# Display Settings - Clock".to_string(),
        format!("ClockX={}", clock.x),
        format!("ClockY={}", clock.y),
        format!("ClockFontSize={}", clock.font_size),
        String::new(),
        "# Display Settings - Status Text".to_string(),
        format!("TextX={}", text.x),
        format!("TextY={}", text.y),
        format!("TextFontSize={}", text.font_size),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// ============================================================================
// ConfigStore
// ============================================================================

/// Returns the default config file location.
///
/// Prefers the platform config directory, then the executable's directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .ok_or(ConfigError::NoConfigPath)
}

/// Loads and saves [`TimerConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `explicit`, or for the default location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigPath` if no default location exists.
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Ok(Self::new(path)),
            None => default_config_path().map(Self::new),
        }
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file exists but cannot be read.
    pub fn try_load(&self) -> Result<TimerConfig, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(parse_config(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "config file not found, using defaults");
                Ok(TimerConfig::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Loads the config, falling back to the defaults on any error.
    pub fn load(&self) -> TimerConfig {
        self.try_load().unwrap_or_else(|e| {
            warn!("{}, using defaults", e);
            TimerConfig::default()
        })
    }

    /// Writes the config, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the directory or file cannot be written.
    pub fn save(&self, config: &TimerConfig) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, render_config(config)).map_err(write_err)?;

        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
