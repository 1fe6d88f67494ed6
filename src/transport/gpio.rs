//! GPIO pins for the display control lines.
//!
//! Pins are claimed on demand by BCM number:
//! - D/C (Data/Command): output
//! - RST (Reset): optional output, idle HIGH

use super::{Level, PinMode, TransportError};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use std::collections::HashMap;

impl From<Level> for rppal::gpio::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => rppal::gpio::Level::Low,
            Level::High => rppal::gpio::Level::High,
        }
    }
}

/// Set of GPIO pins claimed by the driver
pub struct GpioBank {
    gpio: Gpio,
    outputs: HashMap<u8, OutputPin>,
    inputs: HashMap<u8, InputPin>,
}

impl GpioBank {
    /// Open the GPIO peripheral
    pub fn new() -> Result<Self, TransportError> {
        let gpio = Gpio::new()?;

        tracing::debug!("GPIO peripheral opened");

        Ok(Self {
            gpio,
            outputs: HashMap::new(),
            inputs: HashMap::new(),
        })
    }

    /// Claim `pin` in the given mode, releasing any previous claim on it
    pub fn configure(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError> {
        self.outputs.remove(&pin);
        self.inputs.remove(&pin);

        let claimed = self.gpio.get(pin)?;
        match mode {
            PinMode::Output => {
                let mut output = claimed.into_output();
                // Keep the line driven after exit, a floating RST would blank the panel
                output.set_reset_on_drop(false);
                self.outputs.insert(pin, output);
            }
            PinMode::Input => {
                self.inputs.insert(pin, claimed.into_input());
            }
        }

        tracing::debug!("GPIO {} configured as {:?}", pin, mode);
        Ok(())
    }

    /// Drive an output pin
    #[inline]
    pub fn write(&mut self, pin: u8, level: Level) -> Result<(), TransportError> {
        let output = self
            .outputs
            .get_mut(&pin)
            .ok_or(TransportError::PinNotConfigured(pin))?;
        output.write(level.into());
        Ok(())
    }
}
