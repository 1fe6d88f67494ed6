//! A transport that records every call instead of touching hardware.
//!
//! Used by the protocol tests: the recorded events can be decoded back into
//! the command/data stream the controller would have seen by following the
//! level of the D/C pin.

use super::{BusAddress, Level, PinMode, Transport, TransportError};
use std::collections::HashMap;

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ConfigurePin(u8, PinMode),
    SetPinLevel(u8, Level),
    SetupBus(BusAddress, u32),
    Transfer(BusAddress, Vec<u8>),
    Sleep(u64),
}

/// Bytes as the controller interprets them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wire {
    Command(u8),
    /// Consecutive data bytes, merged across transfers
    Data(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Vec<Event>,
    fail_bus_setup: bool,
    fail_transfers: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `setup_bus` call fail
    pub fn with_failing_bus(mut self) -> Self {
        self.fail_bus_setup = true;
        self
    }

    /// Make every subsequent `transfer` call fail
    pub fn fail_transfers(&mut self, fail: bool) {
        self.fail_transfers = fail;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Total number of bytes sent over the bus
    pub fn bytes_sent(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e {
                Event::Transfer(_, bytes) => bytes.len(),
                _ => 0,
            })
            .sum()
    }

    /// Sum of all requested delays
    pub fn slept_ms(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                Event::Sleep(ms) => *ms,
                _ => 0,
            })
            .sum()
    }

    /// Decode the transfers into commands and data, using `dc_pin` as the
    /// data/command line. Transfers made before the line was first driven
    /// are treated as data.
    pub fn wire(&self, dc_pin: u8) -> Vec<Wire> {
        let mut levels: HashMap<u8, Level> = HashMap::new();
        let mut wire = Vec::new();

        for event in &self.events {
            match event {
                Event::SetPinLevel(pin, level) => {
                    levels.insert(*pin, *level);
                }
                Event::Transfer(_, bytes) => match levels.get(&dc_pin) {
                    Some(Level::Low) => wire.extend(bytes.iter().map(|b| Wire::Command(*b))),
                    _ => match wire.last_mut() {
                        Some(Wire::Data(data)) => data.extend_from_slice(bytes),
                        _ => wire.push(Wire::Data(bytes.clone())),
                    },
                },
                _ => {}
            }
        }

        wire
    }
}

impl Transport for RecordingTransport {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), TransportError> {
        self.events.push(Event::ConfigurePin(pin, mode));
        Ok(())
    }

    fn set_pin_level(&mut self, pin: u8, level: Level) -> Result<(), TransportError> {
        self.events.push(Event::SetPinLevel(pin, level));
        Ok(())
    }

    fn setup_bus(&mut self, address: BusAddress, clock_hz: u32) -> Result<(), TransportError> {
        if self.fail_bus_setup {
            return Err(TransportError::Rejected(format!("cannot open {}", address)));
        }
        self.events.push(Event::SetupBus(address, clock_hz));
        Ok(())
    }

    fn transfer(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), TransportError> {
        if self.fail_transfers {
            return Err(TransportError::Rejected(format!("transfer on {}", address)));
        }
        self.events.push(Event::Transfer(address, buffer.to_vec()));
        // MISO idles high with nothing driving it
        buffer.fill(0xFF);
        Ok(())
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.events.push(Event::Sleep(ms));
    }
}
