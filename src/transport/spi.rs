//! SPI buses for the display.
//!
//! Each display sits on one spidev node, addressed by bus number and
//! chip-select line. Buses run in Mode 0 (CPOL=0, CPHA=0), 8 bits per word.

use super::{BusAddress, TransportError};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use std::collections::HashMap;

fn bus_for(number: u8) -> Result<Bus, TransportError> {
    match number {
        0 => Ok(Bus::Spi0),
        1 => Ok(Bus::Spi1),
        2 => Ok(Bus::Spi2),
        3 => Ok(Bus::Spi3),
        4 => Ok(Bus::Spi4),
        5 => Ok(Bus::Spi5),
        6 => Ok(Bus::Spi6),
        other => Err(TransportError::UnsupportedBus(other)),
    }
}

fn slave_select_for(line: u8) -> Result<SlaveSelect, TransportError> {
    match line {
        0 => Ok(SlaveSelect::Ss0),
        1 => Ok(SlaveSelect::Ss1),
        2 => Ok(SlaveSelect::Ss2),
        other => Err(TransportError::UnsupportedChipSelect(other)),
    }
}

/// Open SPI buses, keyed by address
pub struct SpiBuses {
    buses: HashMap<BusAddress, Spi>,
}

impl SpiBuses {
    pub fn new() -> Self {
        Self {
            buses: HashMap::new(),
        }
    }

    /// Open (or reopen) the bus at `address` with the given clock speed
    pub fn open(&mut self, address: BusAddress, clock_hz: u32) -> Result<(), TransportError> {
        let spi = Spi::new(
            bus_for(address.bus)?,
            slave_select_for(address.chip_select)?,
            clock_hz,
            Mode::Mode0,
        )?;

        tracing::debug!("SPI initialized: {}, Speed={}Hz, Mode=0", address, clock_hz);

        self.buses.insert(address, spi);
        Ok(())
    }

    /// Full-duplex transfer; `buffer` is replaced by the bytes read back
    pub fn transfer(
        &mut self,
        address: BusAddress,
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        let spi = self
            .buses
            .get_mut(&address)
            .ok_or(TransportError::BusNotConfigured(address))?;

        let write = buffer.to_vec();
        let actual = spi.transfer(buffer, &write)?;
        if actual != write.len() {
            return Err(TransportError::ShortTransfer {
                expected: write.len(),
                actual,
            });
        }

        Ok(())
    }
}

impl Default for SpiBuses {
    fn default() -> Self {
        Self::new()
    }
}
