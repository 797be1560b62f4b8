//! Panel and cache configuration constants
//!
//! Geometry of the ILI9341 panel and the default run-buffer layout used by the
//! firmware. Cache instances take their configuration at construction; these
//! constants are the values the firmware passes in.

/// ILI9341 panel width in pixels (portrait)
pub const ILI9341_WIDTH: u16 = 240;

/// ILI9341 panel height in pixels (portrait)
pub const ILI9341_HEIGHT: u16 = 320;

/// Number of run buffers the firmware gives the write cache
pub const DEFAULT_RUN_BUFFER_COUNT: usize = 4;

/// Bytes of storage per run buffer.
///
/// 128 bytes holds 64 RGB565 pixels or 42 RGB666 pixels per run.
pub const DEFAULT_RUN_BUFFER_BYTES: usize = 128;

/// Upper bound on run buffers per cache instance
pub const MAX_RUN_BUFFERS: usize = 8;
