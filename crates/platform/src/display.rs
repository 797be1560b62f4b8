//! Display abstraction layer
//!
//! [`TftDevice`] is the set of bus primitives a TFT controller (ILI9341 class)
//! exposes to the layers above it: an addressing window, a streaming memory
//! write, and a completion wait. Everything that talks to the panel, cached or
//! not, goes through this trait.

use embedded_graphics::geometry::Size;

/// Bus primitives of a windowed TFT controller.
///
/// Coordinates are inclusive on both ends, matching the controller's
/// column/page address registers.
pub trait TftDevice {
    /// Error type for bus operations
    type Error: core::fmt::Debug;

    /// Panel dimensions in pixels.
    fn dimensions(&self) -> Size;

    /// Set the horizontal addressing window `x0..=x1`.
    fn set_column_address(&mut self, x0: u16, x1: u16) -> Result<(), Self::Error>;

    /// Set the vertical addressing window `y0..=y1`.
    fn set_page_address(&mut self, y0: u16, y1: u16) -> Result<(), Self::Error>;

    /// Open a streaming memory write at the start of the current window.
    fn begin_write(&mut self) -> Result<(), Self::Error>;

    /// Stream raw encoded pixel bytes into the open write.
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Address `(x0, y0)..=(x1, y1)`, open a write and stream `data` into it.
    fn write_region(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        self.set_column_address(x0, x1)?;
        self.set_page_address(y0, y1)?;
        self.begin_write()?;
        self.write_data(data)
    }

    /// Uncached single-pixel write. `data` holds one encoded pixel.
    fn set_pixel(&mut self, x: u16, y: u16, data: &[u8]) -> Result<(), Self::Error> {
        self.write_region(x, y, x, y, data)
    }

    /// Block until any in-flight transaction has completed.
    fn wait(&mut self) -> Result<(), Self::Error>;
}

impl<T: TftDevice + ?Sized> TftDevice for &mut T {
    type Error = T::Error;

    fn dimensions(&self) -> Size {
        (**self).dimensions()
    }

    fn set_column_address(&mut self, x0: u16, x1: u16) -> Result<(), Self::Error> {
        (**self).set_column_address(x0, x1)
    }

    fn set_page_address(&mut self, y0: u16, y1: u16) -> Result<(), Self::Error> {
        (**self).set_page_address(y0, y1)
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        (**self).begin_write()
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_data(data)
    }

    fn write_region(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        (**self).write_region(x0, y0, x1, y1, data)
    }

    fn set_pixel(&mut self, x: u16, y: u16, data: &[u8]) -> Result<(), Self::Error> {
        (**self).set_pixel(x, y, data)
    }

    fn wait(&mut self) -> Result<(), Self::Error> {
        (**self).wait()
    }
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// SPI communication error
    Communication,
    /// GPIO (D/C line) error
    Gpio,
    /// Addressing window is reversed or exceeds the panel
    InvalidWindow,
    /// Display busy
    Busy,
    /// Timeout
    Timeout,
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Communication => write!(f, "Display communication error"),
            Self::Gpio => write!(f, "Display GPIO error"),
            Self::InvalidWindow => write!(f, "Display addressing window out of range"),
            Self::Busy => write!(f, "Display is busy"),
            Self::Timeout => write!(f, "Display operation timeout"),
        }
    }
}
