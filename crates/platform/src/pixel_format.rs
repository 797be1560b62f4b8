//! Raw pixel formats understood by the TFT controller.
//!
//! A color travels through the stack as a packed `u32`; only the low
//! [`PixelFormat::width`] bytes are meaningful and they are emitted
//! little-endian (low byte first), which is the order the bytes go out on
//! the wire.

/// Controller pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 16-bit RGB565, 2 bytes per pixel
    Rgb565,
    /// 18-bit RGB666, 3 bytes per pixel
    Rgb666,
}

impl PixelFormat {
    /// Bytes per pixel on the wire.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Rgb666 => 3,
        }
    }

    /// Encode `color` into wire bytes. Only the first [`width`](Self::width)
    /// bytes of the result are meaningful.
    #[must_use]
    pub const fn encode(self, color: u32) -> [u8; 3] {
        let [b0, b1, b2, _] = color.to_le_bytes();
        match self {
            Self::Rgb565 => [b0, b1, 0],
            Self::Rgb666 => [b0, b1, b2],
        }
    }

    /// Encode `color` into an [`EncodedPixel`] that derefs to exactly
    /// `width()` bytes.
    #[must_use]
    pub const fn encoded(self, color: u32) -> EncodedPixel {
        EncodedPixel {
            bytes: self.encode(color),
            format: self,
        }
    }

    /// ILI9341 COLMOD (0x3A) parameter selecting this format for the MCU
    /// interface.
    #[must_use]
    pub const fn colmod(self) -> u8 {
        match self {
            Self::Rgb565 => 0x55,
            Self::Rgb666 => 0x66,
        }
    }
}

/// One encoded pixel, sized to its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedPixel {
    bytes: [u8; 3],
    format: PixelFormat,
}

impl EncodedPixel {
    /// Format this pixel was encoded for.
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }
}

impl core::ops::Deref for EncodedPixel {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        let (head, _) = self.bytes.split_at(self.format.width());
        head
    }
}
