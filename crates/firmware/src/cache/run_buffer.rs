//! Run buffer: one fixed-capacity byte buffer holding a single run of
//! adjacent pixels.
//!
//! State machine:
//!
//! ```text
//! Clean ──start──▶ Unaligned ──2nd pixel──▶ Horizontal | Vertical
//!   ▲                  │                          │
//!   └──────reset───────┴──────────reset───────────┘
//! ```
//!
//! A run only ever grows at its tail, one pixel at a time, so the bytes in
//! the buffer are exactly the pixels of the window returned by
//! [`RunBuffer::window`], in controller scan order.

use super::ConfigError;

/// Axis a run is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// At most one pixel written, axis not chosen yet
    Unaligned,
    /// Run grows left to right along one row
    Horizontal,
    /// Run grows top to bottom along one column
    Vertical,
}

/// Fixed-capacity buffer accumulating one run.
pub struct RunBuffer<'a> {
    storage: &'a mut [u8],
    cursor: usize,
    pixel_count: usize,
    anchor: (u16, u16),
    orientation: Orientation,
    // Flushed storage the device may still be reading.
    pending: bool,
    // Cache-assigned sequence number of the open run.
    opened: u32,
}

impl<'a> RunBuffer<'a> {
    /// Wrap externally owned `storage`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NullPointer`] if `storage` is empty.
    pub fn new(storage: &'a mut [u8]) -> Result<Self, ConfigError> {
        if storage.is_empty() {
            return Err(ConfigError::NullPointer);
        }
        Ok(Self {
            storage,
            cursor: 0,
            pixel_count: 0,
            anchor: (0, 0),
            orientation: Orientation::Unaligned,
            pending: false,
            opened: 0,
        })
    }

    /// Drop the open run. Storage is kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.pixel_count = 0;
        self.orientation = Orientation::Unaligned;
    }

    /// `true` while a run is open.
    pub fn is_dirty(&self) -> bool {
        self.pixel_count != 0
    }

    /// `true` when no run is open.
    pub fn is_clean(&self) -> bool {
        !self.is_dirty()
    }

    /// `true` when the buffer has backing storage.
    pub fn is_valid(&self) -> bool {
        !self.storage.is_empty()
    }

    /// Storage size in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes written into the open run.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pixels in the open run.
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// First pixel of the open run.
    pub fn anchor(&self) -> (u16, u16) {
        self.anchor
    }

    /// Axis of the open run.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Encoded bytes of the open run.
    pub fn data(&self) -> &[u8] {
        self.storage.get(..self.cursor).unwrap_or_default()
    }

    /// `true` if another `pixel_size`-byte pixel fits.
    pub fn has_room(&self, pixel_size: usize) -> bool {
        self.cursor
            .checked_add(pixel_size)
            .is_some_and(|end| end <= self.storage.len())
    }

    /// Axis the run would lock to if `(x, y)` were appended, or `None` if
    /// `(x, y)` is not the next pixel of the run. Capacity is not considered.
    pub fn extension(&self, x: u16, y: u16) -> Option<Orientation> {
        if self.is_clean() {
            return None;
        }
        let (ax, ay) = self.anchor;
        let count = u32::try_from(self.pixel_count).unwrap_or(u32::MAX);
        let next_x = u32::from(ax).saturating_add(count);
        let next_y = u32::from(ay).saturating_add(count);

        let along_row = y == ay && u32::from(x) == next_x;
        let along_column = x == ax && u32::from(y) == next_y;

        match self.orientation {
            Orientation::Unaligned if along_row => Some(Orientation::Horizontal),
            Orientation::Unaligned if along_column => Some(Orientation::Vertical),
            Orientation::Horizontal if along_row => Some(Orientation::Horizontal),
            Orientation::Vertical if along_column => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// Open a new run at `(x, y)` with `pixel` as its first pixel.
    ///
    /// Returns `false`, leaving the buffer untouched, if the buffer is dirty
    /// or `pixel` does not fit.
    pub fn start(&mut self, x: u16, y: u16, pixel: &[u8]) -> bool {
        if self.is_dirty() || !self.has_room(pixel.len()) {
            return false;
        }
        self.anchor = (x, y);
        self.orientation = Orientation::Unaligned;
        self.write(pixel)
    }

    /// Append `pixel` at `(x, y)` if it extends the open run and fits.
    pub fn push(&mut self, x: u16, y: u16, pixel: &[u8]) -> bool {
        if !self.has_room(pixel.len()) {
            return false;
        }
        let Some(orientation) = self.extension(x, y) else {
            return false;
        };
        self.orientation = orientation;
        self.write(pixel)
    }

    /// Inclusive screen window `(x0, y0, x1, y1)` covered by the open run.
    /// A single-pixel run covers just its anchor.
    pub fn window(&self) -> (u16, u16, u16, u16) {
        let (x0, y0) = self.anchor;
        let span = u16::try_from(self.pixel_count.saturating_sub(1)).unwrap_or(u16::MAX);
        match self.orientation {
            Orientation::Unaligned => (x0, y0, x0, y0),
            Orientation::Horizontal => (x0, y0, x0.saturating_add(span), y0),
            Orientation::Vertical => (x0, y0, x0, y0.saturating_add(span)),
        }
    }

    /// `true` if the open run already holds a pixel at `(x, y)`.
    pub fn covers(&self, x: u16, y: u16) -> bool {
        if self.is_clean() {
            return false;
        }
        let (x0, y0, x1, y1) = self.window();
        (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
    }

    /// Fill storage with `pixel` repeated for as many whole pixels as fit and
    /// return the filled bytes. Only valid on a clean buffer; the run state is
    /// not touched.
    pub fn tile(&mut self, pixel: &[u8]) -> &[u8] {
        if pixel.is_empty() || self.is_dirty() {
            return &[];
        }
        let whole = self
            .storage
            .len()
            .checked_div(pixel.len())
            .and_then(|n| n.checked_mul(pixel.len()))
            .unwrap_or(0);
        let tile = self.storage.get_mut(..whole).unwrap_or_default();
        for chunk in tile.chunks_exact_mut(pixel.len()) {
            chunk.copy_from_slice(pixel);
        }
        tile
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub(crate) fn opened(&self) -> u32 {
        self.opened
    }

    pub(crate) fn set_opened(&mut self, sequence: u32) {
        self.opened = sequence;
    }

    fn write(&mut self, pixel: &[u8]) -> bool {
        let Some(end) = self.cursor.checked_add(pixel.len()) else {
            return false;
        };
        let Some(slot) = self.storage.get_mut(self.cursor..end) else {
            return false;
        };
        slot.copy_from_slice(pixel);
        self.cursor = end;
        self.pixel_count = self.pixel_count.saturating_add(1);
        true
    }
}
