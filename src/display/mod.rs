//! Display projection and presentation.
//!
//! - `projection`: pure mapping from engine snapshot to a [`Frame`]
//! - `flash`: the finished-state opacity pulse
//! - `presenter`: terminal, JSON-lines and recording surfaces

pub mod flash;
pub mod presenter;
pub mod projection;

pub use flash::FlashEffect;
pub use presenter::{JsonPresenter, Presenter, RecordingPresenter, TerminalPresenter};
pub use projection::{finished_clock, format_clock, project, Frame, VisualEffect};
