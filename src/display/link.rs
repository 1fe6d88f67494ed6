//! Command/data link to the controller.
//!
//! The D/C line selects how the controller interprets each byte on the bus:
//! LOW for a command, HIGH for data. The line is not restored after a
//! transfer, so every logical command starts with `send_command`.

use crate::transport::{BusAddress, Level, Transport, TransportError};

/// Largest single transfer; matches the default spidev buffer size
pub const CHUNK_SIZE: usize = 4096;

pub struct Link<T> {
    transport: T,
    address: BusAddress,
    dc_pin: u8,
}

impl<T: Transport> Link<T> {
    pub fn new(transport: T, address: BusAddress, dc_pin: u8) -> Self {
        Self {
            transport,
            address,
            dc_pin,
        }
    }

    pub fn address(&self) -> BusAddress {
        self.address
    }

    pub fn dc_pin(&self) -> u8 {
        self.dc_pin
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a command byte to the display
    ///
    /// Sets DC pin LOW before sending (command mode)
    pub fn send_command(&mut self, cmd: u8) -> Result<(), TransportError> {
        self.transport.set_pin_level(self.dc_pin, Level::Low)?;
        self.transport.transfer(self.address, &mut [cmd])
    }

    /// Send a single data byte to the display
    ///
    /// Sets DC pin HIGH before sending (data mode)
    pub fn send_data(&mut self, data: u8) -> Result<(), TransportError> {
        self.transport.set_pin_level(self.dc_pin, Level::High)?;
        self.transport.transfer(self.address, &mut [data])
    }

    /// Send a buffer of data bytes, e.g. a pixel stream
    ///
    /// The buffer is consumed by the full-duplex transfer and holds the
    /// bytes read back afterwards.
    pub fn send_data_buf(&mut self, data: &mut [u8]) -> Result<(), TransportError> {
        if data.is_empty() {
            return Ok(());
        }

        self.transport.set_pin_level(self.dc_pin, Level::High)?;
        for chunk in data.chunks_mut(CHUNK_SIZE) {
            self.transport.transfer(self.address, chunk)?;
        }

        Ok(())
    }

    /// Send command followed by data bytes
    pub fn send_command_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), TransportError> {
        self.send_command(cmd)?;
        let mut buf = data.to_vec();
        self.send_data_buf(&mut buf)
    }

    /// Block for a settle time
    pub fn delay_ms(&mut self, ms: u64) {
        self.transport.sleep_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::recording::{Event, RecordingTransport, Wire};

    const DC: u8 = 24;
    const ADDR: BusAddress = BusAddress::new(0, 1);

    fn link() -> Link<RecordingTransport> {
        Link::new(RecordingTransport::new(), ADDR, DC)
    }

    #[test]
    fn command_drives_dc_low() {
        let mut link = link();
        link.send_command(0x29).unwrap();
        assert_eq!(
            link.transport().events(),
            &[
                Event::SetPinLevel(DC, Level::Low),
                Event::Transfer(ADDR, vec![0x29]),
            ]
        );
    }

    #[test]
    fn data_drives_dc_high() {
        let mut link = link();
        link.send_data(0x06).unwrap();
        assert_eq!(
            link.transport().events(),
            &[
                Event::SetPinLevel(DC, Level::High),
                Event::Transfer(ADDR, vec![0x06]),
            ]
        );
    }

    #[test]
    fn bulk_data_is_chunked() {
        let mut link = link();
        let mut buf = vec![0x5A; CHUNK_SIZE * 2 + 10];
        link.send_data_buf(&mut buf).unwrap();

        let sizes: Vec<usize> = link
            .transport()
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Transfer(_, bytes) => Some(bytes.len()),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![CHUNK_SIZE, CHUNK_SIZE, 10]);
        assert_eq!(
            link.transport().wire(DC),
            vec![Wire::Data(vec![0x5A; CHUNK_SIZE * 2 + 10])]
        );
    }

    #[test]
    fn empty_payload_sends_nothing() {
        let mut link = link();
        link.send_command_data(0x2C, &[]).unwrap();
        assert_eq!(link.transport().wire(DC), vec![Wire::Command(0x2C)]);
    }

    #[test]
    fn transfer_errors_propagate() {
        let mut link = link();
        link.transport_mut().fail_transfers(true);
        assert!(link.send_command(0x01).is_err());
        assert!(link.send_data_buf(&mut [1, 2, 3]).is_err());
    }
}
