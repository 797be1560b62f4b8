//! Mock implementations for testing
//!
//! [`RecordingDevice`] implements [`TftDevice`] on the host. It records every
//! call for assertions and models the controller's frame memory (address
//! window plus auto-incrementing write pointer), so a test can read back what
//! the panel would show.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use embedded_graphics::geometry::Size;

use crate::{DisplayError, PixelFormat, TftDevice};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    /// `set_column_address(x0, x1)`
    SetColumn(u16, u16),
    /// `set_page_address(y0, y1)`
    SetPage(u16, u16),
    /// `begin_write()`
    BeginWrite,
    /// `write_data(bytes)`
    WriteData(Vec<u8>),
    /// `write_region(x0, y0, x1, y1, bytes)`
    WriteRegion {
        /// Window left column
        x0: u16,
        /// Window top row
        y0: u16,
        /// Window right column (inclusive)
        x1: u16,
        /// Window bottom row (inclusive)
        y1: u16,
        /// Streamed bytes
        data: Vec<u8>,
    },
    /// `set_pixel(x, y, bytes)`
    SetPixel {
        /// Column
        x: u16,
        /// Row
        y: u16,
        /// Encoded pixel
        data: Vec<u8>,
    },
    /// `wait()`
    Wait,
}

#[derive(Debug, Clone, Copy, Default)]
struct Window {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

/// Mock TFT device with a shadow frame memory
pub struct RecordingDevice {
    width: u16,
    height: u16,
    format: PixelFormat,
    calls: Vec<DeviceCall>,
    screen: Vec<Option<u32>>,
    window: Window,
    cursor: (u16, u16),
    partial: Vec<u8>,
    writing: bool,
    transfers: usize,
    fail_transfer: Option<usize>,
    fail_wait: bool,
}

impl RecordingDevice {
    /// Create a new mock panel of `width` × `height` pixels in `format`.
    pub fn new(width: u16, height: u16, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            calls: Vec::new(),
            screen: vec![None; usize::from(width) * usize::from(height)],
            window: Window::default(),
            cursor: (0, 0),
            partial: Vec::new(),
            writing: false,
            transfers: 0,
            fail_transfer: None,
            fail_wait: false,
        }
    }

    /// Make the `n`-th data transfer from now (0-based) fail with
    /// [`DisplayError::Communication`]. Data transfers are `write_data`,
    /// `write_region` and `set_pixel` calls. One-shot.
    pub fn fail_transfer(&mut self, n: usize) {
        self.fail_transfer = Some(self.transfers + n);
    }

    /// Make the next `wait` call fail with [`DisplayError::Timeout`].
    /// One-shot.
    pub fn fail_wait(&mut self) {
        self.fail_wait = true;
    }

    /// Every call recorded so far
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Forget recorded calls (the shadow screen is kept)
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Recorded `write_region` calls as `(x0, y0, x1, y1, bytes)`
    pub fn region_writes(&self) -> Vec<(u16, u16, u16, u16, Vec<u8>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::WriteRegion {
                    x0,
                    y0,
                    x1,
                    y1,
                    data,
                } => Some((*x0, *y0, *x1, *y1, data.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded `set_pixel` calls
    pub fn pixel_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::SetPixel { .. }))
            .count()
    }

    /// Number of recorded `wait` calls
    pub fn wait_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::Wait))
            .count()
    }

    /// Concatenation of all bytes passed to `write_data`
    pub fn streamed_bytes(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::WriteData(data) => Some(data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Packed color last written at `(x, y)`, `None` if never written
    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.screen[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// The whole shadow screen, row-major
    pub fn screen(&self) -> &[Option<u32>] {
        &self.screen
    }

    fn transfer(&mut self) -> Result<(), DisplayError> {
        let index = self.transfers;
        self.transfers += 1;
        if self.fail_transfer == Some(index) {
            self.fail_transfer = None;
            return Err(DisplayError::Communication);
        }
        Ok(())
    }

    fn check_range(start: u16, end: u16, limit: u16) -> Result<(), DisplayError> {
        if start > end || end >= limit {
            return Err(DisplayError::InvalidWindow);
        }
        Ok(())
    }

    fn open(&mut self) {
        self.cursor = (self.window.x0, self.window.y0);
        self.partial.clear();
        self.writing = true;
    }

    fn stream(&mut self, data: &[u8]) {
        if !self.writing {
            return;
        }
        let width = self.format.width();
        for &byte in data {
            self.partial.push(byte);
            if self.partial.len() < width {
                continue;
            }
            let mut le = [0u8; 4];
            le[..width].copy_from_slice(&self.partial);
            self.partial.clear();

            let (x, y) = self.cursor;
            self.screen[usize::from(y) * usize::from(self.width) + usize::from(x)] =
                Some(u32::from_le_bytes(le));

            // Controller RAM pointer: left to right, then top to bottom,
            // wrapping back to the window origin.
            self.cursor = if x < self.window.x1 {
                (x + 1, y)
            } else if y < self.window.y1 {
                (self.window.x0, y + 1)
            } else {
                (self.window.x0, self.window.y0)
            };
        }
    }

    fn address(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        Self::check_range(x0, x1, self.width)?;
        Self::check_range(y0, y1, self.height)?;
        self.window = Window { x0, y0, x1, y1 };
        self.writing = false;
        Ok(())
    }
}

impl TftDevice for RecordingDevice {
    type Error = DisplayError;

    fn dimensions(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }

    fn set_column_address(&mut self, x0: u16, x1: u16) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::SetColumn(x0, x1));
        Self::check_range(x0, x1, self.width)?;
        self.window.x0 = x0;
        self.window.x1 = x1;
        self.writing = false;
        Ok(())
    }

    fn set_page_address(&mut self, y0: u16, y1: u16) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::SetPage(y0, y1));
        Self::check_range(y0, y1, self.height)?;
        self.window.y0 = y0;
        self.window.y1 = y1;
        self.writing = false;
        Ok(())
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::BeginWrite);
        self.open();
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::WriteData(data.to_vec()));
        self.transfer()?;
        self.stream(data);
        Ok(())
    }

    fn write_region(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::WriteRegion {
            x0,
            y0,
            x1,
            y1,
            data: data.to_vec(),
        });
        self.transfer()?;
        self.address(x0, y0, x1, y1)?;
        self.open();
        self.stream(data);
        self.writing = false;
        Ok(())
    }

    fn set_pixel(&mut self, x: u16, y: u16, data: &[u8]) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::SetPixel {
            x,
            y,
            data: data.to_vec(),
        });
        self.transfer()?;
        self.address(x, y, x, y)?;
        self.open();
        self.stream(data);
        self.writing = false;
        Ok(())
    }

    fn wait(&mut self) -> Result<(), Self::Error> {
        self.calls.push(DeviceCall::Wait);
        if core::mem::take(&mut self.fail_wait) {
            return Err(DisplayError::Timeout);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn region_write_fills_window_row_major() {
        let mut dev = RecordingDevice::new(8, 8, PixelFormat::Rgb565);
        dev.write_region(1, 1, 2, 2, &[1, 0, 2, 0, 3, 0, 4, 0])
            .unwrap();
        assert_eq!(dev.pixel(1, 1), Some(1));
        assert_eq!(dev.pixel(2, 1), Some(2));
        assert_eq!(dev.pixel(1, 2), Some(3));
        assert_eq!(dev.pixel(2, 2), Some(4));
        assert_eq!(dev.pixel(0, 0), None);
    }

    #[test]
    fn streamed_write_spans_calls() {
        let mut dev = RecordingDevice::new(4, 4, PixelFormat::Rgb666);
        dev.set_column_address(0, 3).unwrap();
        dev.set_page_address(3, 3).unwrap();
        dev.begin_write().unwrap();
        // Second pixel straddles two write_data calls.
        dev.write_data(&[1, 2, 3, 4]).unwrap();
        dev.write_data(&[5, 6]).unwrap();
        assert_eq!(dev.pixel(0, 3), Some(0x03_0201));
        assert_eq!(dev.pixel(1, 3), Some(0x06_0504));
        assert_eq!(dev.streamed_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rejects_reversed_or_oversized_window() {
        let mut dev = RecordingDevice::new(4, 4, PixelFormat::Rgb565);
        assert_eq!(
            dev.set_column_address(3, 1),
            Err(DisplayError::InvalidWindow)
        );
        assert_eq!(dev.set_page_address(0, 4), Err(DisplayError::InvalidWindow));
    }

    #[test]
    fn injected_failure_is_one_shot() {
        let mut dev = RecordingDevice::new(4, 4, PixelFormat::Rgb565);
        dev.fail_transfer(1);
        assert!(dev.set_pixel(0, 0, &[1, 0]).is_ok());
        assert_eq!(
            dev.set_pixel(1, 0, &[2, 0]),
            Err(DisplayError::Communication)
        );
        assert!(dev.set_pixel(1, 0, &[2, 0]).is_ok());
        assert_eq!(dev.pixel_writes(), 3);
    }

    #[test]
    fn injected_wait_failure_is_one_shot() {
        let mut dev = RecordingDevice::new(4, 4, PixelFormat::Rgb565);
        dev.fail_wait();
        assert_eq!(dev.wait(), Err(DisplayError::Timeout));
        assert!(dev.wait().is_ok());
        assert_eq!(dev.wait_count(), 2);
    }
}
