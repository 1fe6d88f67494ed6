//! Pixel formats and their wire encodings.
//!
//! Full: 18-bit interface format fed with 8-bit channels, 3 bytes per pixel.
//! The controller keeps the top 6 bits of each channel.
//!
//! Reduced: 12-bit format, 4 bits per channel, two pixels packed into 3 bytes
//! in the controller's interface order:
//!
//! ```text
//! byte 0: R0 G0
//! byte 1: B0 R1
//! byte 2: G1 B1
//! ```
//!
//! (high nibble first in each byte).

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// On-wire pixel encoding, fixed per display instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    #[default]
    Full,
    Reduced,
}

impl PixelFormat {
    /// COLMOD parameter byte
    pub fn colmod(self) -> u8 {
        match self {
            PixelFormat::Full => 0x06,
            PixelFormat::Reduced => 0x03,
        }
    }

    /// Wire bytes for a run of `pixels` identical pixels
    pub fn run_len(self, pixels: usize) -> usize {
        match self {
            PixelFormat::Full => pixels * 3,
            // Odd runs still end with a complete pair
            PixelFormat::Reduced => pixels.div_ceil(2) * 3,
        }
    }

    /// Encode a run of `pixels` copies of `color`
    pub fn encode_run(self, color: Color, pixels: usize) -> Vec<u8> {
        match self {
            PixelFormat::Full => [color.r, color.g, color.b].repeat(pixels),
            PixelFormat::Reduced => pack_pair(color, color).repeat(pixels.div_ceil(2)),
        }
    }
}

/// An RGB colour with 8-bit channels. In reduced mode only the low 4 bits
/// of each channel are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels truncated to 4 bits
    pub const fn masked(self) -> Self {
        Self {
            r: self.r & 0x0F,
            g: self.g & 0x0F,
            b: self.b & 0x0F,
        }
    }

    /// Full-mode wire bytes
    pub fn to_full(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Reduced-mode wire bytes for a lone pixel: the first 12 bits of a pair
    pub(crate) fn to_reduced(self) -> [u8; 2] {
        let [b0, b1, _] = pack_pair(self, Color::BLACK);
        [b0, b1]
    }
}

/// Error parsing a colour from `R,G,B`
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid colour '{0}', expected R,G,B with values 0-255")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels: Vec<u8> = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseColorError(s.to_string()))?;

        match channels.as_slice() {
            [r, g, b] => Ok(Color::new(*r, *g, *b)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Pack two reduced-mode pixels into 3 wire bytes
pub fn pack_pair(first: Color, second: Color) -> [u8; 3] {
    let a = first.masked();
    let b = second.masked();
    [(a.r << 4) | a.g, (a.b << 4) | b.r, (b.g << 4) | b.b]
}

/// Inverse of [`pack_pair`]
pub fn unpack_pair(bytes: [u8; 3]) -> (Color, Color) {
    let first = Color::new(bytes[0] >> 4, bytes[0] & 0x0F, bytes[1] >> 4);
    let second = Color::new(bytes[1] & 0x0F, bytes[2] >> 4, bytes[2] & 0x0F);
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_layout() {
        let bytes = pack_pair(Color::new(0x1, 0x2, 0x3), Color::new(0x4, 0x5, 0x6));
        assert_eq!(bytes, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn pair_masks_to_four_bits() {
        let bytes = pack_pair(Color::new(0xF1, 0xA2, 0x33), Color::new(0x04, 0xF5, 0xE6));
        assert_eq!(bytes, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn pair_round_trips_every_channel_value() {
        for v in 0..=0x0F {
            for w in 0..=0x0F {
                let first = Color::new(v, w, v ^ w);
                let second = Color::new(w, v ^ 0x0F, v);
                assert_eq!(unpack_pair(pack_pair(first, second)), (first, second));
            }
        }
    }

    #[test]
    fn lone_reduced_pixel() {
        assert_eq!(Color::new(0xA, 0xB, 0xC).to_reduced(), [0xAB, 0xC0]);
    }

    #[test]
    fn runs() {
        let c = Color::new(1, 2, 3);
        assert_eq!(PixelFormat::Full.encode_run(c, 2), vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(PixelFormat::Reduced.encode_run(c, 2), vec![0x12, 0x31, 0x23]);
        // Three pixels round up to two complete pairs
        assert_eq!(PixelFormat::Reduced.encode_run(c, 3).len(), 6);
        assert_eq!(PixelFormat::Reduced.run_len(3), 6);
        assert_eq!(PixelFormat::Full.run_len(20480), 61440);
        assert!(PixelFormat::Full.encode_run(c, 0).is_empty());
    }

    #[test]
    fn parse_color() {
        assert_eq!("0, 70,160".parse::<Color>(), Ok(Color::new(0, 70, 160)));
        assert!("1,2".parse::<Color>().is_err());
        assert!("1,2,256".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
    }

    #[test]
    fn colmod_codes() {
        assert_eq!(PixelFormat::Full.colmod(), 0x06);
        assert_eq!(PixelFormat::Reduced.colmod(), 0x03);
    }
}
