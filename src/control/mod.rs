//! Settings/control surface.
//!
//! - `validation`: the settings form and its rules
//! - `surface`: buttons, phase tracking and the request channel

pub mod surface;
pub mod validation;

pub use surface::{
    Button, ButtonStates, ControlError, ControlMessage, ControlRequest, ControlSurface,
};
pub use validation::{FormField, SettingsForm, ValidationError};
