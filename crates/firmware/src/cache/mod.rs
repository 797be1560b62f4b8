//! Pixel write-combining cache
//!
//! Sits between the drawing layer and a [`platform::TftDevice`]. Runs of
//! horizontally or vertically adjacent pixel writes are collected in
//! [`RunBuffer`]s and sent as one windowed write each, instead of one
//! addressed transaction per pixel.

pub mod run_buffer;
pub mod write_cache;

pub use run_buffer::{Orientation, RunBuffer};
pub use write_cache::WriteCache;

/// Construction-time configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A buffer slot was given no backing storage
    NullPointer,
    /// Buffer set is empty, too large, or a buffer cannot hold one pixel
    InvalidValue,
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NullPointer => write!(f, "Run buffer has no backing storage"),
            Self::InvalidValue => write!(f, "Invalid cache configuration"),
        }
    }
}

/// Errors returned by [`WriteCache`] operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CacheError<E> {
    /// Invalid configuration
    Config(ConfigError),
    /// Error reported by the display device, passed through unchanged
    Device(E),
}

impl<E> From<ConfigError> for CacheError<E> {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for CacheError<E> {}

impl<E: core::fmt::Debug> core::fmt::Display for CacheError<E> {
    #[allow(clippy::use_debug)] // device error types only guarantee Debug
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Device(err) => write!(f, "Display device error: {err:?}"),
        }
    }
}
