//! Address windows and clipping.
//!
//! Every drawing operation first arms a window with CASET/RASET/RAMWR; the
//! controller then fills it row by row from the top-left corner. Windows are
//! never cached, each primitive sets its own.

use super::command::cmd;
use super::{Display, DisplayError};
use crate::transport::Transport;

/// Inclusive rectangle `(x1, y1)-(x2, y2)` in display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x1: u8,
    pub y1: u8,
    pub x2: u8,
    pub y2: u8,
}

impl Window {
    pub const fn new(x1: u8, y1: u8, x2: u8, y2: u8) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Accept: 0 <= x1 <= x2 < width and 0 <= y1 <= y2 < height
    pub fn fits(&self, width: u8, height: u8) -> bool {
        self.x1 <= self.x2 && self.x2 < width && self.y1 <= self.y2 && self.y2 < height
    }

    /// Pixels the controller expects after RAMWR
    ///
    /// Zero for an inverted window.
    pub fn pixel_count(&self) -> usize {
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return 0;
        }
        let w = (self.x2 - self.x1) as usize + 1;
        let h = (self.y2 - self.y1) as usize + 1;
        w * h
    }
}

/// What a drawing call actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Drawn as requested
    Drawn,
    /// Drawn after truncating to the display bounds
    Clipped,
    /// Nothing to draw, no bus traffic
    Skipped,
}

impl Outcome {
    /// Combine the outcomes of the parts of a compound shape
    pub fn merge(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Drawn, Outcome::Drawn) => Outcome::Drawn,
            (Outcome::Skipped, Outcome::Skipped) => Outcome::Skipped,
            _ => Outcome::Clipped,
        }
    }
}

/// Fit a run of `len` pixels starting at `start` into `0..limit`.
///
/// Returns the usable length and whether it was truncated, or `None` when
/// there is nothing to draw (zero length, or origin at/past the limit).
pub(crate) fn clip_extent(start: u8, len: u8, limit: u8) -> Option<(u8, bool)> {
    if len == 0 || start >= limit {
        return None;
    }

    let room = limit - start;
    if len > room {
        Some((room, true))
    } else {
        Some((len, false))
    }
}

impl<T: Transport> Display<T> {
    /// Arm the controller for a pixel stream into `(x1, y1)-(x2, y2)`.
    ///
    /// Returns `false` without touching the bus if the window does not fit
    /// the current orientation.
    pub fn set_window(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<bool, DisplayError> {
        self.arm(Window::new(x1, y1, x2, y2))
    }

    /// Re-issue RAMWR to restart a pixel stream at the window origin
    pub fn activate_ram_write(&mut self) -> Result<(), DisplayError> {
        self.flush_pixels()?;
        self.link.send_command(cmd::RAMWR)?;
        Ok(())
    }

    pub(crate) fn arm(&mut self, window: Window) -> Result<bool, DisplayError> {
        if !window.fits(self.width, self.height) {
            tracing::trace!(
                "Rejected window {:?} on {}x{}",
                window,
                self.width,
                self.height
            );
            return Ok(false);
        }

        self.flush_pixels()?;

        self.link
            .send_command_data(cmd::CASET, &[0, window.x1, 0, window.x2])?;
        self.link
            .send_command_data(cmd::RASET, &[0, window.y1, 0, window.y2])?;
        self.link.send_command(cmd::RAMWR)?;

        Ok(true)
    }
}
