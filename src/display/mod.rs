//! ST7735S display driver.
//!
//! 128x160 TFT controller on SPI with a D/C line and an optional reset line.
//! A [`Display`] owns its transport and tracks the addressable size for the
//! current orientation; drawing primitives live in `draw`, windowing in
//! `window`.

pub mod command;
pub mod draw;
pub mod link;
pub mod pixel;
pub mod registry;
pub mod window;

// Re-export main types
pub use command::{GammaCurve, Orientation};
pub use pixel::{Color, PixelFormat};
pub use registry::{DisplayHandle, Registry};
pub use window::{Outcome, Window};

use crate::transport::{BusAddress, Level, PinMode, Transport, TransportError};
use command::{cmd, delay};
use link::Link;
use thiserror::Error;

/// Display driver errors
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to set up SPI bus {address}: {source}")]
    BusSetup {
        address: BusAddress,
        source: TransportError,
    },

    #[error("No active display")]
    NoActiveDisplay,

    #[error("Unknown display handle {0:?}")]
    UnknownDisplay(DisplayHandle),
}

/// How a display is wired to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    /// SPI bus and chip select
    pub address: BusAddress,
    /// SPI clock in Hz
    pub spi_speed_hz: u32,
    /// Data/Command pin
    pub dc_pin: u8,
    /// Reset pin, `None` if not connected
    pub reset_pin: Option<u8>,
}

/// One ST7735S controller
pub struct Display<T: Transport> {
    link: Link<T>,
    reset_pin: Option<u8>,
    spi_speed_hz: u32,
    format: PixelFormat,
    orientation: Orientation,
    width: u8,
    height: u8,
    /// First half of a reduced-mode pair waiting for its partner
    half_pair: Option<Color>,
}

impl<T: Transport> Display<T> {
    /// Bring up a display: pins, bus, hardware reset and the power-on
    /// command sequence. Leaves it in portrait, default gamma, display on.
    pub fn initialize(
        transport: T,
        wiring: Wiring,
        format: PixelFormat,
    ) -> Result<Self, DisplayError> {
        tracing::info!(
            "Initializing ST7735S on {} ({:?} pixels, {}Hz)",
            wiring.address,
            format,
            wiring.spi_speed_hz
        );

        let mut display = Self {
            link: Link::new(transport, wiring.address, wiring.dc_pin),
            reset_pin: wiring.reset_pin,
            spi_speed_hz: wiring.spi_speed_hz,
            format,
            orientation: Orientation::Portrait,
            width: 0,
            height: 0,
            half_pair: None,
        };

        // Reset line idles HIGH
        if let Some(rs) = display.reset_pin {
            let transport = display.link.transport_mut();
            transport.configure_pin(rs, PinMode::Output)?;
            transport.set_pin_level(rs, Level::High)?;
        }

        // D/C level does not matter until the first transfer
        display
            .link
            .transport_mut()
            .configure_pin(wiring.dc_pin, PinMode::Output)?;

        display
            .link
            .transport_mut()
            .setup_bus(wiring.address, wiring.spi_speed_hz)
            .map_err(|source| DisplayError::BusSetup {
                address: wiring.address,
                source,
            })?;

        display.hardware_reset()?;
        display.power_on()?;

        tracing::info!("Display initialized successfully");
        Ok(display)
    }

    /// Power-on command sequence
    fn power_on(&mut self) -> Result<(), DisplayError> {
        // Software reset; wait minimum 120ms
        self.link.send_command(cmd::SWRESET)?;
        self.link.delay_ms(delay::SWRESET);

        // Sleep out; wait minimum 120ms
        self.link.send_command(cmd::SLPOUT)?;
        self.link.delay_ms(delay::SLPOUT);

        self.set_orientation(Orientation::Portrait)?;
        self.set_gamma(GammaCurve::default())?;

        self.link
            .send_command_data(cmd::COLMOD, &[self.format.colmod()])?;

        // Display on; wait 100ms before use
        self.link.send_command(cmd::DISPON)?;
        self.link.delay_ms(delay::DISPON);

        Ok(())
    }

    /// Pulse the reset line. No-op if it is not connected.
    pub fn hardware_reset(&mut self) -> Result<(), DisplayError> {
        let Some(rs) = self.reset_pin else {
            return Ok(());
        };

        tracing::debug!("Performing hardware reset");

        let transport = self.link.transport_mut();
        transport.set_pin_level(rs, Level::High)?;
        transport.set_pin_level(rs, Level::Low)?;
        transport.sleep_ms(delay::HW_RESET_PULSE);
        transport.set_pin_level(rs, Level::High)?;
        transport.sleep_ms(delay::HW_RESET_SETTLE);

        Ok(())
    }

    /// Tear down: hardware reset if wired, then hand the transport back
    pub fn destroy(mut self) -> Result<T, DisplayError> {
        tracing::info!("Releasing display on {}", self.link.address());
        self.hardware_reset()?;
        Ok(self.link.into_transport())
    }

    /// Set the RAM scan direction and re-arm the full-screen window
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        self.flush_pixels()?;
        self.link
            .send_command_data(cmd::MADCTL, &[orientation.madctl()])?;

        let (width, height) = orientation.dimensions();
        self.orientation = orientation;
        self.width = width;
        self.height = height;

        tracing::debug!("Orientation {:?}: {}x{}", orientation, width, height);

        // The controller keeps the old address bounds after MADCTL
        self.set_window(0, 0, width - 1, height - 1)?;
        Ok(())
    }

    /// Select one of the built-in gamma curves
    pub fn set_gamma(&mut self, gamma: GammaCurve) -> Result<(), DisplayError> {
        self.flush_pixels()?;
        self.link.send_command_data(cmd::GAMSET, &[gamma.code()])?;
        Ok(())
    }

    /// Display inversion on/off
    pub fn set_inversion(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.flush_pixels()?;
        self.link
            .send_command(if inverted { cmd::INVON } else { cmd::INVOFF })?;
        Ok(())
    }

    /// Current addressable width
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Current addressable height
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    pub fn address(&self) -> BusAddress {
        self.link.address()
    }

    pub fn dc_pin(&self) -> u8 {
        self.link.dc_pin()
    }

    pub fn reset_pin(&self) -> Option<u8> {
        self.reset_pin
    }

    pub fn spi_speed_hz(&self) -> u32 {
        self.spi_speed_hz
    }

    pub fn transport(&self) -> &T {
        self.link.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.link.transport_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::recording::{Event, RecordingTransport, Wire};

    const DC: u8 = 24;
    const RS: u8 = 25;
    const ADDR: BusAddress = BusAddress::new(0, 0);

    fn wiring(reset_pin: Option<u8>) -> Wiring {
        Wiring {
            address: ADDR,
            spi_speed_hz: 15_000_000,
            dc_pin: DC,
            reset_pin,
        }
    }

    #[test]
    fn power_on_sequence() {
        let display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Full)
                .unwrap();

        assert_eq!(
            display.transport().wire(DC),
            vec![
                Wire::Command(0x01),
                Wire::Command(0x11),
                Wire::Command(0x36),
                Wire::Data(vec![0x00]),
                Wire::Command(0x2A),
                Wire::Data(vec![0, 0, 0, 127]),
                Wire::Command(0x2B),
                Wire::Data(vec![0, 0, 0, 159]),
                Wire::Command(0x2C),
                Wire::Command(0x26),
                Wire::Data(vec![0x04]),
                Wire::Command(0x3A),
                Wire::Data(vec![0x06]),
                Wire::Command(0x29),
            ]
        );
        assert_eq!((display.width(), display.height()), (128, 160));
        assert_eq!(display.orientation(), Orientation::Portrait);
    }

    #[test]
    fn settle_times_follow_each_command() {
        let display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Full)
                .unwrap();
        let events = display.transport().events();

        let after = |code: u8| {
            let pos = events
                .iter()
                .position(|e| *e == Event::Transfer(ADDR, vec![code]))
                .unwrap();
            events[pos + 1].clone()
        };
        assert!(matches!(after(0x01), Event::Sleep(ms) if ms >= 120));
        assert!(matches!(after(0x11), Event::Sleep(ms) if ms >= 120));
        assert!(matches!(after(0x29), Event::Sleep(ms) if ms >= 100));
    }

    #[test]
    fn reduced_format_selects_12_bit() {
        let display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Reduced)
                .unwrap();
        let wire = display.transport().wire(DC);
        let colmod = wire.iter().position(|w| *w == Wire::Command(0x3A)).unwrap();
        assert_eq!(wire[colmod + 1], Wire::Data(vec![0x03]));
    }

    #[test]
    fn pins_and_bus_are_set_up_before_traffic() {
        let display =
            Display::initialize(RecordingTransport::new(), wiring(Some(RS)), PixelFormat::Full)
                .unwrap();
        let events = display.transport().events();

        assert_eq!(
            &events[..5],
            &[
                Event::ConfigurePin(RS, PinMode::Output),
                Event::SetPinLevel(RS, Level::High),
                Event::ConfigurePin(DC, PinMode::Output),
                Event::SetupBus(ADDR, 15_000_000),
                // hardware reset
                Event::SetPinLevel(RS, Level::High),
            ]
        );
        assert_eq!(
            &events[5..9],
            &[
                Event::SetPinLevel(RS, Level::Low),
                Event::Sleep(10),
                Event::SetPinLevel(RS, Level::High),
                Event::Sleep(150),
            ]
        );
    }

    #[test]
    fn no_reset_pin_means_no_reset_traffic() {
        let mut display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Full)
                .unwrap();
        display.transport_mut().clear();
        display.hardware_reset().unwrap();
        assert!(display.transport().events().is_empty());

        let transport = display.destroy().unwrap();
        assert!(transport.events().is_empty());
    }

    #[test]
    fn destroy_pulses_reset() {
        let mut display =
            Display::initialize(RecordingTransport::new(), wiring(Some(RS)), PixelFormat::Full)
                .unwrap();
        display.transport_mut().clear();

        let transport = display.destroy().unwrap();
        assert_eq!(
            transport.events(),
            &[
                Event::SetPinLevel(RS, Level::High),
                Event::SetPinLevel(RS, Level::Low),
                Event::Sleep(10),
                Event::SetPinLevel(RS, Level::High),
                Event::Sleep(150),
            ]
        );
    }

    #[test]
    fn bus_setup_failure_is_fatal() {
        let result = Display::initialize(
            RecordingTransport::new().with_failing_bus(),
            wiring(Some(RS)),
            PixelFormat::Full,
        );
        assert!(matches!(result, Err(DisplayError::BusSetup { address, .. }) if address == ADDR));
    }

    #[test]
    fn orientation_updates_dimensions() {
        let mut display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Full)
                .unwrap();

        display.set_orientation(Orientation::from_index(1)).unwrap();
        assert_eq!((display.width(), display.height()), (160, 128));

        display.set_orientation(Orientation::from_index(0)).unwrap();
        assert_eq!((display.width(), display.height()), (128, 160));
    }

    #[test]
    fn orientation_rearms_full_window() {
        let mut display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Full)
                .unwrap();
        display.transport_mut().clear();

        display.set_orientation(Orientation::LandscapeFlipped).unwrap();
        assert_eq!(
            display.transport().wire(DC),
            vec![
                Wire::Command(0x36),
                Wire::Data(vec![0xA0]),
                Wire::Command(0x2A),
                Wire::Data(vec![0, 0, 0, 159]),
                Wire::Command(0x2B),
                Wire::Data(vec![0, 0, 0, 127]),
                Wire::Command(0x2C),
            ]
        );
    }

    #[test]
    fn gamma_and_inversion() {
        let mut display =
            Display::initialize(RecordingTransport::new(), wiring(None), PixelFormat::Full)
                .unwrap();
        display.transport_mut().clear();

        display.set_gamma(GammaCurve::from_level(3)).unwrap();
        display.set_inversion(true).unwrap();
        display.set_inversion(false).unwrap();

        assert_eq!(
            display.transport().wire(DC),
            vec![
                Wire::Command(0x26),
                Wire::Data(vec![0x08]),
                Wire::Command(0x21),
                Wire::Command(0x20),
            ]
        );
    }
}
