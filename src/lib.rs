//! Driver for ST7735S TFT LCD controllers on a Raspberry Pi SPI bus.
//!
//! The driver speaks the controller's command protocol over any
//! [`transport::Transport`]; [`transport::RpiTransport`] is the hardware
//! implementation and [`transport::RecordingTransport`] records traffic
//! for tests.

pub mod config;
pub mod display;
pub mod transport;

pub use config::Config;
pub use display::{
    Color, Display, DisplayError, DisplayHandle, GammaCurve, Orientation, Outcome, PixelFormat,
    Registry, Window, Wiring,
};
pub use transport::{BusAddress, RpiTransport, Transport, TransportError};
