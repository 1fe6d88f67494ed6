//! Hardware transport used by the display driver.
//!
//! The driver never touches GPIO or SPI directly. Everything goes through the
//! [`Transport`] trait: pin setup, SPI bus setup, full-duplex transfers and
//! blocking delays. [`RpiTransport`] drives a Raspberry Pi through `rppal`,
//! [`RecordingTransport`] records every call for protocol tests.

pub mod gpio;
pub mod recording;
pub mod spi;

pub use recording::RecordingTransport;

use gpio::GpioBank;
use spi::SpiBuses;
use std::fmt;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Logic level of an output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// SPI bus number and chip-select line, i.e. `/dev/spidev<bus>.<chip_select>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusAddress {
    pub bus: u8,
    pub chip_select: u8,
}

impl BusAddress {
    pub const fn new(bus: u8, chip_select: u8) -> Self {
        Self { bus, chip_select }
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spidev{}.{}", self.bus, self.chip_select)
    }
}

/// Transport-level errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("SPI error: {0}")]
    Spi(#[from] rppal::spi::Error),

    #[error("Unsupported SPI bus: {0}")]
    UnsupportedBus(u8),

    #[error("Unsupported chip select line: {0}")]
    UnsupportedChipSelect(u8),

    #[error("SPI bus {0} has not been set up")]
    BusNotConfigured(BusAddress),

    #[error("GPIO {0} is not configured as an output")]
    PinNotConfigured(u8),

    #[error("Short SPI transfer: expected {expected} bytes, transferred {actual}")]
    ShortTransfer { expected: usize, actual: usize },

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Capability the driver needs from the platform.
///
/// All calls are synchronous and blocking. `transfer` is full duplex: the
/// buffer is sent and then overwritten with whatever was clocked back in.
pub trait Transport {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError>;

    fn set_pin_level(&mut self, pin: u8, level: Level) -> Result<(), TransportError>;

    fn setup_bus(&mut self, address: BusAddress, clock_hz: u32) -> Result<(), TransportError>;

    fn transfer(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), TransportError>;

    /// Block for at least `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u64);
}

/// Raspberry Pi transport: GPIO character device plus spidev, via `rppal`
pub struct RpiTransport {
    gpio: GpioBank,
    spi: SpiBuses,
}

impl RpiTransport {
    /// Open the GPIO peripheral. SPI buses are opened later by `setup_bus`.
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            gpio: GpioBank::new()?,
            spi: SpiBuses::new(),
        })
    }
}

impl Transport for RpiTransport {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError> {
        self.gpio.configure(pin, mode)
    }

    fn set_pin_level(&mut self, pin: u8, level: Level) -> Result<(), TransportError> {
        self.gpio.write(pin, level)
    }

    fn setup_bus(&mut self, address: BusAddress, clock_hz: u32) -> Result<(), TransportError> {
        self.spi.open(address, clock_hz)
    }

    fn transfer(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), TransportError> {
        self.spi.transfer(address, buffer)
    }

    fn sleep_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}
