//! Display stack for the ILI9341 TFT panel
//!
//! - [`ili9341`]: SPI bus driver implementing [`platform::TftDevice`]
//! - [`draw_target`]: embedded-graphics backend over the pixel write cache

pub mod draw_target;
pub mod ili9341;

pub use draw_target::{CacheDrawTarget, WireColor};
pub use ili9341::{Command, Ili9341};

/// Display width in pixels (ILI9341, portrait)
pub const DISPLAY_WIDTH: u16 = platform::config::ILI9341_WIDTH;

/// Display height in pixels (ILI9341, portrait)
pub const DISPLAY_HEIGHT: u16 = platform::config::ILI9341_HEIGHT;
