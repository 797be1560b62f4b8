//! TFT display firmware
//!
//! Pixel write-combining cache and display plumbing for an ILI9341-class
//! TFT controller.
//!
//! # Architecture
//!
//! ```text
//! Painter (embedded-graphics)
//!         ↓
//! CacheDrawTarget (display::draw_target)
//!         ↓
//! WriteCache + RunBuffers (cache)
//!         ↓
//! TftDevice (platform) ── Ili9341 over SPI (display::ili9341)
//! ```
//!
//! # Features
//!
//! - `defmt` - Log cache and display events through defmt
//! - `std` - Enable standard library (host testing)
//!
//! # Example
//!
//! ```no_run
//! use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::*};
//! use platform::config::{DEFAULT_RUN_BUFFER_BYTES, DEFAULT_RUN_BUFFER_COUNT};
//! use platform::{PixelFormat, TftDevice};
//! use tft_firmware::{CacheDrawTarget, WriteCache};
//!
//! fn paint<D: TftDevice>(device: D) {
//!     let mut storage = [[0u8; DEFAULT_RUN_BUFFER_BYTES]; DEFAULT_RUN_BUFFER_COUNT];
//!     let slots = storage.iter_mut().map(|b| &mut b[..]);
//!     let Ok(cache) =
//!         WriteCache::<_, DEFAULT_RUN_BUFFER_COUNT>::new(device, PixelFormat::Rgb565, slots)
//!     else {
//!         return;
//!     };
//!     let Ok(mut target) = CacheDrawTarget::<_, Rgb565, DEFAULT_RUN_BUFFER_COUNT>::new(cache)
//!     else {
//!         return;
//!     };
//!     let _ = Circle::new(Point::new(20, 20), 40)
//!         .into_styled(PrimitiveStyle::with_stroke(Rgb565::GREEN, 1))
//!         .draw(&mut target);
//!     let _ = target.flush();
//! }
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod cache;
pub mod display;

pub use cache::{CacheError, ConfigError, Orientation, RunBuffer, WriteCache};
pub use display::{CacheDrawTarget, Ili9341, WireColor, DISPLAY_HEIGHT, DISPLAY_WIDTH};
