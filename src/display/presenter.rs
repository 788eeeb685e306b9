//! Presentation surfaces.
//!
//! The overlay window itself lives outside this crate. These presenters
//! hand frames to a terminal, to an external renderer as JSON lines, or to
//! a test recorder.

use std::io::{self, Write};

use serde::Serialize;

use super::projection::{Frame, VisualEffect};
use crate::types::Layout;

/// Opacity below which the terminal hides the clock during a flash.
const TERMINAL_FLASH_THRESHOLD: f32 = 0.65;

/// A surface that displays frames.
pub trait Presenter {
    /// Displays one frame with the configured layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn present(&mut self, frame: &Frame, layout: &Layout) -> io::Result<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, frame: &Frame, layout: &Layout) -> io::Result<()> {
        (**self).present(frame, layout)
    }
}

// ============================================================================
// TerminalPresenter
// ============================================================================

/// Writes one text line per visible change.
pub struct TerminalPresenter<W: Write> {
    out: W,
    last_line: Option<String>,
}

impl TerminalPresenter<io::Stdout> {
    /// Creates a presenter on stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: None,
        }
    }

    /// Consumes the presenter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_line(frame: &Frame) -> String {
        let clock = match frame.effect {
            VisualEffect::Flash { opacity } if opacity < TERMINAL_FLASH_THRESHOLD => {
                " ".repeat(frame.clock.chars().count())
            }
            _ => frame.clock.clone(),
        };

        if frame.status.is_empty() {
            clock
        } else {
            format!("{}  {}", clock, frame.status)
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, frame: &Frame, _layout: &Layout) -> io::Result<()> {
        let line = Self::render_line(frame);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }

        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        self.last_line = Some(line);
        Ok(())
    }
}

// ============================================================================
// JsonPresenter
// ============================================================================

#[derive(Serialize)]
struct JsonFrame<'a> {
    #[serde(flatten)]
    frame: &'a Frame,
    layout: &'a Layout,
}

/// Writes one JSON object per frame, for an external overlay renderer.
pub struct JsonPresenter<W: Write> {
    out: W,
    last_frame: Option<Frame>,
}

impl JsonPresenter<io::Stdout> {
    /// Creates a presenter on stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: None,
        }
    }

    /// Consumes the presenter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, frame: &Frame, layout: &Layout) -> io::Result<()> {
        if self.last_frame.as_ref() == Some(frame) {
            return Ok(());
        }

        serde_json::to_writer(&mut self.out, &JsonFrame { frame, layout })?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

// ============================================================================
// RecordingPresenter
// ============================================================================

/// Records every presented frame, for tests.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    frames: Vec<Frame>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames presented so far.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Status texts in presentation order with consecutive repeats collapsed.
    pub fn status_sequence(&self) -> Vec<String> {
        let mut sequence: Vec<String> = Vec::new();
        for frame in &self.frames {
            if sequence.last() != Some(&frame.status) {
                sequence.push(frame.status.clone());
            }
        }
        sequence
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &Frame, _layout: &Layout) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
