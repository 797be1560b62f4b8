//! Hardware Abstraction Layer (HAL) for the TFT display stack
//!
//! This crate provides the trait-based boundary between the firmware's
//! drawing path and the physical display controller, so the pixel cache and
//! its adapters can be developed and tested without hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Painter / embedded-graphics (firmware crate)
//!         ↓
//! Pixel write cache (firmware crate)
//!         ↓
//! Platform HAL (this crate - TftDevice, PixelFormat)
//!         ↓
//! Bus driver (ILI9341 over SPI, or a mock)
//! ```
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable defmt derives on platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::{PixelFormat, TftDevice};
//!
//! fn paint_dot<D: TftDevice>(display: &mut D) -> Result<(), D::Error> {
//!     let px = PixelFormat::Rgb565.encoded(0xF800);
//!     display.set_pixel(10, 10, &px)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod display;
pub mod mocks;
pub mod pixel_format;

pub use display::{DisplayError, TftDevice};
pub use pixel_format::{EncodedPixel, PixelFormat};
