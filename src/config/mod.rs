//! Persistence of the timer configuration.
//!
//! Only duration, status texts and layout persist; timer progress never
//! does.

mod error;
mod store;

pub use error::ConfigError;
pub use store::{
    default_config_path, parse_config, render_config, ConfigStore, APP_DIR_NAME, CONFIG_FILE_NAME,
};
