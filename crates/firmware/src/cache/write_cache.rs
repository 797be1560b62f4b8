//! Write-combining cache over a [`TftDevice`].
//!
//! # Placement policy
//!
//! For every pixel, in order:
//!
//! 0. If an open run already covers the pixel, send that run first, so no
//!    two open runs ever overlap and their send order does not matter.
//! 1. If it extends an open run, append it. A run that is full is sent and
//!    the pixel opens a fresh run in the same buffer.
//! 2. Otherwise open a new run in the next clean buffer, round-robin from
//!    the most recently opened one.
//! 3. Otherwise evict the run that was opened first and reuse its buffer.
//! 4. With no usable buffer at all, write the pixel uncached.
//!
//! Flushed storage may still be read by the bus hardware. Before a flushed
//! buffer is written again the cache blocks on [`TftDevice::wait`] once.
//!
//! Runs are reset when sent even if the device reports an error; the error
//! is returned to the caller and the pixels of that run are lost.

use heapless::Vec;
use platform::{config::MAX_RUN_BUFFERS, PixelFormat, TftDevice};

use super::{CacheError, ConfigError, RunBuffer};

/// Pixel write cache owning up to `N` run buffers over borrowed storage.
pub struct WriteCache<'a, D, const N: usize = { MAX_RUN_BUFFERS }> {
    device: D,
    format: PixelFormat,
    buffers: Vec<RunBuffer<'a>, N>,
    // Buffer holding the most recently opened run.
    current: usize,
    // Sequence number given to the next opened run.
    next_run: u32,
}

impl<'a, D, const N: usize> WriteCache<'a, D, N>
where
    D: TftDevice,
{
    /// Build a cache with one run buffer per storage slice.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NullPointer`] if a slice is empty.
    /// - [`ConfigError::InvalidValue`] if no slice is given, more than `N`
    ///   are given, or a slice is shorter than one pixel of `format`.
    pub fn new<I>(device: D, format: PixelFormat, storage: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a mut [u8]>,
    {
        let mut buffers = Vec::new();
        for slice in storage {
            let buffer = RunBuffer::new(slice)?;
            if buffer.capacity() < format.width() {
                return Err(ConfigError::InvalidValue);
            }
            buffers
                .push(buffer)
                .map_err(|_| ConfigError::InvalidValue)?;
        }
        if buffers.is_empty() {
            return Err(ConfigError::InvalidValue);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "write cache: {=usize} run buffers, format {}",
            buffers.len(),
            format
        );

        Ok(Self {
            device,
            format,
            buffers,
            current: 0,
            next_run: 0,
        })
    }

    /// Build a cache without run buffers. Every pixel takes the uncached
    /// path and fills stream pixel by pixel.
    pub fn uncached(device: D, format: PixelFormat) -> Self {
        Self {
            device,
            format,
            buffers: Vec::new(),
            current: 0,
            next_run: 0,
        }
    }

    /// Pixel format colors are encoded with.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of run buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of buffers holding an open run.
    pub fn dirty_count(&self) -> usize {
        self.buffers.iter().filter(|b| b.is_dirty()).count()
    }

    /// Run buffer at `index`.
    pub fn buffer(&self, index: usize) -> Option<&RunBuffer<'a>> {
        self.buffers.get(index)
    }

    /// Underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Underlying device, mutably. Writing through it bypasses the cache;
    /// call [`flush`](Self::flush) first.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give back the device. Open runs are discarded, so flush first.
    pub fn release(self) -> D {
        self.device
    }

    /// Queue one pixel. Returns `false` if a device error occurred while
    /// placing it; see [`write_pixel`](Self::write_pixel).
    pub fn set_pixel(&mut self, x: u16, y: u16, color: u32) -> bool {
        self.write_pixel(x, y, color).is_ok()
    }

    /// Queue one pixel, sending runs to the device as needed.
    ///
    /// An error from sending an evicted run is returned after the new pixel
    /// has been queued. If waiting for the device before reusing a buffer
    /// fails, the pixel is written uncached and the wait error is returned.
    pub fn write_pixel(&mut self, x: u16, y: u16, color: u32) -> Result<(), CacheError<D::Error>> {
        let pixel = self.format.encoded(color);

        // Dirty runs stay disjoint: a run already covering this pixel is
        // sent before the pixel is queued anywhere else.
        let covering = self.buffers.iter().position(|b| b.covers(x, y));
        let sent = match covering {
            Some(index) => self.flush_buffer(index),
            None => Ok(()),
        };

        self.place(x, y, &pixel).and(sent)
    }

    fn place(&mut self, x: u16, y: u16, pixel: &[u8]) -> Result<(), CacheError<D::Error>> {
        let count = self.buffers.len();

        for step in 0..count {
            let index = self.slot(step);
            let Some(buffer) = self.buffers.get_mut(index) else {
                continue;
            };
            if !buffer.is_valid() || buffer.extension(x, y).is_none() {
                continue;
            }
            if buffer.push(x, y, pixel) {
                return Ok(());
            }
            // Full: send it and continue the line in the same buffer.
            let flushed = self.flush_buffer(index);
            let started = self.start_run(index, x, y, pixel);
            return flushed.and(started);
        }

        for step in 0..count {
            let index = self.slot(step);
            if self
                .buffers
                .get(index)
                .is_some_and(|b| b.is_valid() && b.is_clean())
            {
                self.current = index;
                return self.start_run(index, x, y, pixel);
            }
        }

        if let Some(index) = self.oldest_run() {
            #[cfg(feature = "defmt")]
            defmt::trace!("evicting run buffer {=usize}", index);

            let flushed = self.flush_buffer(index);
            self.current = index;
            let started = self.start_run(index, x, y, pixel);
            return flushed.and(started);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("no run buffer, writing ({=u16}, {=u16}) uncached", x, y);

        self.device
            .set_pixel(x, y, pixel)
            .map_err(CacheError::Device)
    }

    /// Send every open run to the device, oldest first.
    ///
    /// Stops at the first device error; runs not yet sent stay queued.
    pub fn flush(&mut self) -> Result<(), CacheError<D::Error>> {
        for _ in 0..self.buffers.len() {
            let Some(index) = self.oldest_run() else {
                break;
            };
            self.flush_buffer(index)?;
        }
        Ok(())
    }

    /// Fill the whole panel with `color`.
    pub fn fill(&mut self, color: u32) -> Result<(), CacheError<D::Error>> {
        let size = self.device.dimensions();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        let x1 = i32::try_from(size.width.saturating_sub(1)).unwrap_or(i32::MAX);
        let y1 = i32::try_from(size.height.saturating_sub(1)).unwrap_or(i32::MAX);
        self.fill_region(0, 0, x1, y1, color)
    }

    /// Fill the inclusive rectangle `(x0, y0)..=(x1, y1)` with `color`.
    ///
    /// Coordinates are clamped to be non-negative and put in ascending
    /// order; they are not checked against the panel size. Open runs are
    /// sent first. The largest run buffer is used as a tile of repeated
    /// pixels streamed into a single addressed write.
    ///
    /// A device error aborts the fill; pixels already streamed stay on the
    /// panel.
    pub fn fill_region(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u32,
    ) -> Result<(), CacheError<D::Error>> {
        let (x0, x1) = span(x0, x1);
        let (y0, y1) = span(y0, y1);

        self.flush()?;

        let pixel = self.format.encoded(color);
        let columns = u64::from(x1.saturating_sub(x0)).saturating_add(1);
        let rows = u64::from(y1.saturating_sub(y0)).saturating_add(1);
        let pixels = columns.saturating_mul(rows);
        let total_bytes = pixels.saturating_mul(pixel.len() as u64);

        let tile = self
            .buffers
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_valid() && b.capacity() >= pixel.len())
            .max_by_key(|(_, b)| b.capacity())
            .map(|(index, _)| index);
        if let Some(index) = tile {
            self.settle(index)?;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "fill ({=u16}, {=u16})..=({=u16}, {=u16}), {=u64} bytes",
            x0,
            y0,
            x1,
            y1,
            total_bytes
        );

        self.device
            .set_column_address(x0, x1)
            .map_err(CacheError::Device)?;
        self.device
            .set_page_address(y0, y1)
            .map_err(CacheError::Device)?;
        self.device.begin_write().map_err(CacheError::Device)?;

        let result = match tile.and_then(|index| self.buffers.get_mut(index)) {
            Some(buffer) => {
                let result = stream_tile(&mut self.device, buffer.tile(&pixel), total_bytes);
                buffer.set_pending(true);
                result
            }
            None => (0..pixels).try_for_each(|_| self.device.write_data(&pixel)),
        };

        result.map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::warn!("fill aborted by device error");
            CacheError::Device(err)
        })
    }

    fn slot(&self, step: usize) -> usize {
        self.current
            .wrapping_add(step)
            .checked_rem(self.buffers.len())
            .unwrap_or(0)
    }

    /// Dirty buffer whose run was opened first.
    fn oldest_run(&self) -> Option<usize> {
        let next = self.next_run;
        self.buffers
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_dirty())
            .max_by_key(|(_, b)| next.wrapping_sub(b.opened()))
            .map(|(index, _)| index)
    }

    /// Send the run in buffer `index`, if any, and reset the buffer.
    fn flush_buffer(&mut self, index: usize) -> Result<(), CacheError<D::Error>> {
        let Some(buffer) = self.buffers.get_mut(index) else {
            return Ok(());
        };
        if buffer.is_clean() {
            return Ok(());
        }
        let (x0, y0, x1, y1) = buffer.window();
        let result = self.device.write_region(x0, y0, x1, y1, buffer.data());
        buffer.reset();
        buffer.set_pending(true);

        result.map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "run ({=u16}, {=u16})..=({=u16}, {=u16}) dropped on device error",
                x0,
                y0,
                x1,
                y1
            );
            CacheError::Device(err)
        })
    }

    /// Open a run in buffer `index`, falling back to an uncached write if
    /// the buffer refuses it or the device cannot be waited on.
    fn start_run(
        &mut self,
        index: usize,
        x: u16,
        y: u16,
        pixel: &[u8],
    ) -> Result<(), CacheError<D::Error>> {
        if let Err(err) = self.settle(index) {
            // Storage may still be on the bus; leave it alone.
            #[cfg(feature = "defmt")]
            defmt::warn!("wait failed, writing ({=u16}, {=u16}) uncached", x, y);

            self.device
                .set_pixel(x, y, pixel)
                .map_err(CacheError::Device)?;
            return Err(err);
        }

        let sequence = self.next_run;
        if let Some(buffer) = self.buffers.get_mut(index) {
            if buffer.start(x, y, pixel) {
                buffer.set_opened(sequence);
                self.next_run = sequence.wrapping_add(1);
                return Ok(());
            }
        }
        self.device
            .set_pixel(x, y, pixel)
            .map_err(CacheError::Device)
    }

    /// Wait for the device if buffer `index` may still be in flight.
    fn settle(&mut self, index: usize) -> Result<(), CacheError<D::Error>> {
        if !self.buffers.get(index).is_some_and(RunBuffer::is_pending) {
            return Ok(());
        }
        self.device.wait().map_err(CacheError::Device)?;
        for buffer in &mut self.buffers {
            buffer.set_pending(false);
        }
        Ok(())
    }
}

/// Clamp to `0..=u16::MAX` and order ascending.
fn span(a: i32, b: i32) -> (u16, u16) {
    let clamp = |v: i32| u16::try_from(v.max(0)).unwrap_or(u16::MAX);
    let (a, b) = (clamp(a), clamp(b));
    (a.min(b), a.max(b))
}

/// Stream `tile` repeatedly until `total_bytes` have been written, the last
/// chunk cut to the remainder.
fn stream_tile<D: TftDevice>(
    device: &mut D,
    tile: &[u8],
    total_bytes: u64,
) -> Result<(), D::Error> {
    let tile_len = tile.len() as u64;
    if tile_len == 0 {
        return Ok(());
    }
    let mut remaining = total_bytes;
    while remaining > 0 {
        let chunk = remaining.min(tile_len);
        let bytes = usize::try_from(chunk)
            .ok()
            .and_then(|n| tile.get(..n))
            .unwrap_or(tile);
        device.write_data(bytes)?;
        remaining = remaining.saturating_sub(chunk);
    }
    Ok(())
}
