//! ILI9341 TFT controller over SPI
//!
//! Implements the [`TftDevice`] bus primitives on top of a blocking
//! [`embedded_hal::spi::SpiDevice`] and a D/C line.
//!
//! # Wiring
//!
//! | Signal | Direction |
//! |--------|-----------|
//! | SCK    | Host → Display |
//! | MOSI   | Host → Display |
//! | D/C    | Host → Display (low = command, high = data) |
//! | CS     | Managed by `SpiDevice` |
//!
//! Reset, sleep and orientation are left to board bring-up code; this driver
//! only addresses frame memory and streams pixels into it.

use embedded_graphics::geometry::Size;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use platform::config::{ILI9341_HEIGHT, ILI9341_WIDTH};
use platform::{DisplayError, PixelFormat, TftDevice};

/// ILI9341 command codes used by this driver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Column address set — 4 data bytes (start, end; big-endian u16).
    ColumnAddressSet = 0x2A,
    /// Page address set — 4 data bytes (start, end; big-endian u16).
    PageAddressSet = 0x2B,
    /// Memory write — pixel data follows.
    MemoryWrite = 0x2C,
    /// Interface pixel format — 1 data byte.
    PixelFormatSet = 0x3A,
}

/// ILI9341 driver.
///
/// Generic over:
/// - `SPI` — a blocking [`embedded_hal::spi::SpiDevice`] (manages CS).
/// - `DC`  — Data/Command [`embedded_hal::digital::OutputPin`].
pub struct Ili9341<SPI, DC> {
    spi: SPI,
    dc: DC,
    width: u16,
    height: u16,
}

impl<SPI, DC> Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Driver for a 240×320 panel in its native portrait orientation.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self::with_size(spi, dc, ILI9341_WIDTH, ILI9341_HEIGHT)
    }

    /// Driver for a panel whose controller was configured for `width` ×
    /// `height` (e.g. landscape 320×240).
    pub fn with_size(spi: SPI, dc: DC, width: u16, height: u16) -> Self {
        Self {
            spi,
            dc,
            width,
            height,
        }
    }

    /// Select the interface pixel format (COLMOD).
    pub fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), DisplayError> {
        self.cmd_data(Command::PixelFormatSet, &[format.colmod()])
    }

    /// Give back the bus and D/C pin.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    /// Assert DC low (command mode) and send one command byte.
    fn send_command(&mut self, cmd: Command) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Gpio)?;
        self.spi
            .write(&[cmd as u8])
            .map_err(|_| DisplayError::Communication)
    }

    /// Assert DC high (data mode) and send bytes.
    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(|_| DisplayError::Gpio)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::Communication)
    }

    fn cmd_data(&mut self, cmd: Command, data: &[u8]) -> Result<(), DisplayError> {
        self.send_command(cmd)?;
        self.send_data(data)
    }

    fn set_range(
        &mut self,
        cmd: Command,
        start: u16,
        end: u16,
        limit: u16,
    ) -> Result<(), DisplayError> {
        if start > end || end >= limit {
            return Err(DisplayError::InvalidWindow);
        }
        let [s_hi, s_lo] = start.to_be_bytes();
        let [e_hi, e_lo] = end.to_be_bytes();
        self.cmd_data(cmd, &[s_hi, s_lo, e_hi, e_lo])
    }
}

impl<SPI, DC> TftDevice for Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = DisplayError;

    fn dimensions(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }

    fn set_column_address(&mut self, x0: u16, x1: u16) -> Result<(), Self::Error> {
        let width = self.width;
        self.set_range(Command::ColumnAddressSet, x0, x1, width)
    }

    fn set_page_address(&mut self, y0: u16, y1: u16) -> Result<(), Self::Error> {
        let height = self.height;
        self.set_range(Command::PageAddressSet, y0, y1, height)
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        self.send_command(Command::MemoryWrite)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.send_data(data)
    }

    // Blocking SPI: every transfer has completed when `write` returns.
    fn wait(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    /// The three SPI expectations produced by one `SpiDevice::write(&data)`.
    fn spi_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    #[test]
    fn column_address_is_big_endian() {
        let spi_txns: Vec<_> = [
            spi_write(&[0x2A]),
            spi_write(&[0x00, 0x10, 0x01, 0x0F]),
        ]
        .concat();
        let mut spi = SpiMock::new(&spi_txns);
        let mut dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut drv = Ili9341::with_size(spi.clone(), dc.clone(), 320, 240);
        drv.set_column_address(0x0010, 0x010F).unwrap();

        spi.done();
        dc.done();
    }

    #[test]
    fn reversed_or_oversized_window_sends_nothing() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = PinMock::new(&[]);

        let mut drv = Ili9341::new(spi.clone(), dc.clone());
        assert_eq!(
            drv.set_column_address(10, 9),
            Err(DisplayError::InvalidWindow)
        );
        assert_eq!(
            drv.set_page_address(0, ILI9341_HEIGHT),
            Err(DisplayError::InvalidWindow)
        );

        spi.done();
        dc.done();
    }

    #[test]
    fn write_region_addresses_then_streams() {
        let spi_txns: Vec<_> = [
            spi_write(&[0x2A]),
            spi_write(&[0x00, 0x01, 0x00, 0x02]),
            spi_write(&[0x2B]),
            spi_write(&[0x00, 0x05, 0x00, 0x05]),
            spi_write(&[0x2C]),
            spi_write(&[0xF8, 0x00, 0x07, 0xE0]),
        ]
        .concat();
        let mut spi = SpiMock::new(&spi_txns);
        let dc_txns: Vec<_> = (0..3)
            .flat_map(|_| {
                [
                    PinTransaction::set(PinState::Low),
                    PinTransaction::set(PinState::High),
                ]
            })
            .collect();
        let mut dc = PinMock::new(&dc_txns);

        let mut drv = Ili9341::new(spi.clone(), dc.clone());
        drv.write_region(1, 5, 2, 5, &[0xF8, 0x00, 0x07, 0xE0])
            .unwrap();

        spi.done();
        dc.done();
    }

    #[test]
    fn pixel_format_sends_colmod() {
        let spi_txns: Vec<_> = [spi_write(&[0x3A]), spi_write(&[0x66])].concat();
        let mut spi = SpiMock::new(&spi_txns);
        let mut dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut drv = Ili9341::new(spi.clone(), dc.clone());
        drv.set_pixel_format(PixelFormat::Rgb666).unwrap();

        spi.done();
        dc.done();
    }

    #[test]
    fn empty_data_is_not_sent() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = PinMock::new(&[]);

        let mut drv = Ili9341::new(spi.clone(), dc.clone());
        drv.write_data(&[]).unwrap();
        drv.wait().unwrap();
        assert_eq!(drv.dimensions(), Size::new(240, 320));

        spi.done();
        dc.done();
    }
}
