//! Drawing primitives.
//!
//! Every primitive clips its size to the display, arms a window and streams
//! one colour into it. A request whose origin is off-screen, or whose size
//! is zero, draws nothing and sends nothing.

use super::pixel::{Color, PixelFormat, pack_pair};
use super::window::{Outcome, Window, clip_extent};
use super::{Display, DisplayError};
use crate::transport::Transport;

impl<T: Transport> Display<T> {
    /// Send one pixel into an already armed window.
    ///
    /// Reduced mode holds the pixel until its partner arrives, so a stream of
    /// single pushes goes out as packed 3-byte pairs. A held pixel is sent
    /// doubled by [`Display::flush_pixels`] or before the next command.
    pub fn push_pixel(&mut self, color: Color) -> Result<(), DisplayError> {
        match self.format {
            PixelFormat::Full => self.link.send_data_buf(&mut color.to_full())?,
            PixelFormat::Reduced => match self.half_pair.take() {
                Some(first) => self.link.send_data_buf(&mut pack_pair(first, color))?,
                None => self.half_pair = Some(color),
            },
        }
        Ok(())
    }

    /// Send two pixels into an already armed window.
    ///
    /// Reduced mode packs them into 3 bytes; full mode sends 6.
    pub fn push_pixel_pair(&mut self, first: Color, second: Color) -> Result<(), DisplayError> {
        match self.format {
            PixelFormat::Full => {
                let [r0, g0, b0] = first.to_full();
                let [r1, g1, b1] = second.to_full();
                self.link.send_data_buf(&mut [r0, g0, b0, r1, g1, b1])?;
            }
            PixelFormat::Reduced => match self.half_pair.take() {
                Some(held) => {
                    self.link.send_data_buf(&mut pack_pair(held, first))?;
                    self.half_pair = Some(second);
                }
                None => self.link.send_data_buf(&mut pack_pair(first, second))?,
            },
        }
        Ok(())
    }

    /// Send a pixel held back by [`Display::push_pixel`] as a complete pair
    pub fn flush_pixels(&mut self) -> Result<(), DisplayError> {
        if let Some(held) = self.half_pair.take() {
            self.link.send_data_buf(&mut pack_pair(held, held))?;
        }
        Ok(())
    }

    /// Draw a single pixel
    pub fn draw_pixel(&mut self, x: u8, y: u8, color: Color) -> Result<Outcome, DisplayError> {
        if !self.arm(Window::new(x, y, x, y))? {
            return Ok(Outcome::Skipped);
        }
        // A 1x1 window only needs the first 12 bits of a pair
        match self.format {
            PixelFormat::Full => self.link.send_data_buf(&mut color.to_full())?,
            PixelFormat::Reduced => self.link.send_data_buf(&mut color.to_reduced())?,
        }
        Ok(Outcome::Drawn)
    }

    /// Draw a horizontal line of `len` pixels starting at `(x, y)`
    pub fn draw_hline(
        &mut self,
        x: u8,
        y: u8,
        len: u8,
        color: Color,
    ) -> Result<Outcome, DisplayError> {
        let Some((len, clipped)) = clip_extent(x, len, self.width) else {
            return Ok(Outcome::Skipped);
        };
        self.fill_window(Window::new(x, y, x + len - 1, y), clipped, color)
    }

    /// Draw a vertical line of `len` pixels starting at `(x, y)`
    pub fn draw_vline(
        &mut self,
        x: u8,
        y: u8,
        len: u8,
        color: Color,
    ) -> Result<Outcome, DisplayError> {
        let Some((len, clipped)) = clip_extent(y, len, self.height) else {
            return Ok(Outcome::Skipped);
        };
        self.fill_window(Window::new(x, y, x, y + len - 1), clipped, color)
    }

    /// Draw a filled `w` x `h` rectangle with its top-left corner at `(x, y)`
    pub fn fill_rect(
        &mut self,
        x: u8,
        y: u8,
        w: u8,
        h: u8,
        color: Color,
    ) -> Result<Outcome, DisplayError> {
        let Some((w, clipped_w)) = clip_extent(x, w, self.width) else {
            return Ok(Outcome::Skipped);
        };
        let Some((h, clipped_h)) = clip_extent(y, h, self.height) else {
            return Ok(Outcome::Skipped);
        };
        self.fill_window(
            Window::new(x, y, x + w - 1, y + h - 1),
            clipped_w || clipped_h,
            color,
        )
    }

    /// Draw a 1-pixel rectangle outline.
    ///
    /// Shapes under 3x3 have no interior and are drawn filled instead.
    pub fn draw_rect(
        &mut self,
        x: u8,
        y: u8,
        w: u8,
        h: u8,
        color: Color,
    ) -> Result<Outcome, DisplayError> {
        if w < 3 || h < 3 {
            return self.fill_rect(x, y, w, h, color);
        }

        // Sides are inset one row so the corners are drawn once
        let top = self.draw_hline(x, y, w, color)?;
        let bottom = match y.checked_add(h - 1) {
            Some(bottom) => self.draw_hline(x, bottom, w, color)?,
            None => Outcome::Skipped,
        };
        let left = match y.checked_add(1) {
            Some(y1) => self.draw_vline(x, y1, h - 2, color)?,
            None => Outcome::Skipped,
        };
        let right = match (x.checked_add(w - 1), y.checked_add(1)) {
            (Some(x1), Some(y1)) => self.draw_vline(x1, y1, h - 2, color)?,
            _ => Outcome::Skipped,
        };

        Ok(top.merge(bottom).merge(left).merge(right))
    }

    /// Fill the whole display
    pub fn fill_screen(&mut self, color: Color) -> Result<Outcome, DisplayError> {
        self.fill_rect(0, 0, self.width, self.height, color)
    }

    /// Arm `window` and stream `color` into every pixel of it
    fn fill_window(
        &mut self,
        window: Window,
        clipped: bool,
        color: Color,
    ) -> Result<Outcome, DisplayError> {
        if !self.arm(window)? {
            return Ok(Outcome::Skipped);
        }

        let pixels = window.pixel_count();
        let mut run = self.format.encode_run(color, pixels);
        tracing::trace!(
            "Streaming {} pixels ({} bytes) into {:?}",
            pixels,
            run.len(),
            window
        );
        self.link.send_data_buf(&mut run)?;

        Ok(if clipped {
            Outcome::Clipped
        } else {
            Outcome::Drawn
        })
    }
}
