//! embedded-graphics backend over the write cache
//!
//! [`CacheDrawTarget`] plugs a [`WriteCache`] into embedded-graphics: single
//! pixels go through the cache, solid fills and clears take its bulk path.
//! Call [`CacheDrawTarget::flush`] at the end of a paint batch.

use core::marker::PhantomData;

use embedded_graphics::pixelcolor::{Rgb565, Rgb666};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use platform::{PixelFormat, TftDevice};

use crate::cache::{CacheError, ConfigError, WriteCache};

/// Colors that can be packed into the controller's wire order.
///
/// The low [`PixelFormat::width`] bytes of [`to_wire`](Self::to_wire),
/// little-endian, are the bytes sent to the panel.
pub trait WireColor: PixelColor {
    /// Wire format for this color type.
    const FORMAT: PixelFormat;

    /// Pack into the cache's color word.
    fn to_wire(self) -> u32;
}

impl WireColor for Rgb565 {
    const FORMAT: PixelFormat = PixelFormat::Rgb565;

    // Controller takes the high byte first.
    fn to_wire(self) -> u32 {
        u32::from(self.into_storage().swap_bytes())
    }
}

impl WireColor for Rgb666 {
    const FORMAT: PixelFormat = PixelFormat::Rgb666;

    // One byte per channel, R first, 6 significant bits left-aligned.
    #[allow(clippy::arithmetic_side_effects)]
    fn to_wire(self) -> u32 {
        let r = u32::from(self.r()) << 2;
        let g = u32::from(self.g()) << 2;
        let b = u32::from(self.b()) << 2;
        r | (g << 8) | (b << 16)
    }
}

/// [`DrawTarget`] backed by a [`WriteCache`].
pub struct CacheDrawTarget<'a, D, C, const N: usize> {
    cache: WriteCache<'a, D, N>,
    _color: PhantomData<C>,
}

impl<'a, D, C, const N: usize> CacheDrawTarget<'a, D, C, N>
where
    D: TftDevice,
    C: WireColor,
{
    /// Wrap `cache`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the cache encodes a different pixel
    /// format than `C` needs.
    pub fn new(cache: WriteCache<'a, D, N>) -> Result<Self, ConfigError> {
        if cache.format() != C::FORMAT {
            return Err(ConfigError::InvalidValue);
        }
        Ok(Self {
            cache,
            _color: PhantomData,
        })
    }

    /// Send all queued runs to the panel.
    pub fn flush(&mut self) -> Result<(), CacheError<D::Error>> {
        self.cache.flush()
    }

    /// The wrapped cache.
    pub fn cache(&self) -> &WriteCache<'a, D, N> {
        &self.cache
    }

    /// The wrapped cache, mutably.
    pub fn cache_mut(&mut self) -> &mut WriteCache<'a, D, N> {
        &mut self.cache
    }

    /// Unwrap the cache.
    pub fn into_inner(self) -> WriteCache<'a, D, N> {
        self.cache
    }
}

impl<D, C, const N: usize> OriginDimensions for CacheDrawTarget<'_, D, C, N>
where
    D: TftDevice,
{
    fn size(&self) -> Size {
        self.cache.device().dimensions()
    }
}

impl<D, C, const N: usize> DrawTarget for CacheDrawTarget<'_, D, C, N>
where
    D: TftDevice,
    C: WireColor,
{
    type Color = C;
    type Error = CacheError<D::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let size = self.size();
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if u32::from(x) >= size.width || u32::from(y) >= size.height {
                continue;
            }
            self.cache.write_pixel(x, y, color.to_wire())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        self.cache.fill_region(
            area.top_left.x,
            area.top_left.y,
            bottom_right.x,
            bottom_right.y,
            color.to_wire(),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.cache.fill(color.to_wire())
    }
}
