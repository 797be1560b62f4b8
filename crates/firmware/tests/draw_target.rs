//! embedded-graphics integration — primitives drawn through the cached
//! draw target land on the panel as coalesced windowed writes.
//!
//! Run with: cargo test -p tft-firmware --test draw_target

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use embedded_graphics::pixelcolor::{Rgb565, Rgb666};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use platform::mocks::{DeviceCall, RecordingDevice};
use platform::PixelFormat;
use tft_firmware::{CacheDrawTarget, ConfigError, WireColor, WriteCache};

const WIDTH: u16 = 20;
const HEIGHT: u16 = 16;

fn panel() -> RecordingDevice {
    RecordingDevice::new(WIDTH, HEIGHT, PixelFormat::Rgb565)
}

#[test]
fn reports_panel_size() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();
    assert_eq!(target.size(), Size::new(20, 16));
}

#[test]
fn color_type_must_match_cache_format() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    assert_eq!(
        CacheDrawTarget::<_, Rgb666, 1>::new(cache).err(),
        Some(ConfigError::InvalidValue)
    );
}

/// A one-pixel-wide horizontal line is a single run.
#[test]
fn horizontal_line_is_one_window_write() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let mut target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();

    Line::new(Point::new(2, 3), Point::new(9, 3))
        .into_styled(PrimitiveStyle::with_stroke(Rgb565::RED, 1))
        .draw(&mut target)
        .unwrap();
    target.flush().unwrap();

    let device = target.into_inner().release();
    let writes = device.region_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!((writes[0].0, writes[0].1, writes[0].2, writes[0].3), (2, 3, 9, 3));
    assert_eq!(writes[0].4, [0xF8, 0x00].repeat(8));
    for x in 2..=9 {
        assert_eq!(device.pixel(x, 3), Some(Rgb565::RED.to_wire()));
    }
}

#[test]
fn vertical_line_is_one_window_write() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let mut target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();

    Line::new(Point::new(5, 1), Point::new(5, 10))
        .into_styled(PrimitiveStyle::with_stroke(Rgb565::BLUE, 1))
        .draw(&mut target)
        .unwrap();
    target.flush().unwrap();

    let writes = target.cache().device().region_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!((writes[0].0, writes[0].1, writes[0].2, writes[0].3), (5, 1, 5, 10));
}

#[test]
fn pixels_outside_panel_are_dropped() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let mut target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();

    target
        .draw_iter([
            Pixel(Point::new(-1, 0), Rgb565::WHITE),
            Pixel(Point::new(0, -3), Rgb565::WHITE),
            Pixel(Point::new(20, 0), Rgb565::WHITE),
            Pixel(Point::new(0, 16), Rgb565::WHITE),
            Pixel(Point::new(19, 15), Rgb565::WHITE),
        ])
        .unwrap();
    target.flush().unwrap();

    let device = target.into_inner().release();
    assert_eq!(device.region_writes().len(), 1);
    assert_eq!(device.pixel(19, 15), Some(Rgb565::WHITE.to_wire()));
}

/// Solid fills are clipped to the panel and take the streamed path.
#[test]
fn fill_solid_is_clipped_and_streamed() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let mut target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();

    target
        .fill_solid(
            &Rectangle::new(Point::new(16, -2), Size::new(10, 5)),
            Rgb565::GREEN,
        )
        .unwrap();

    let device = target.cache().device();
    assert_eq!(device.calls()[0], DeviceCall::SetColumn(16, 19));
    assert_eq!(device.calls()[1], DeviceCall::SetPage(0, 2));
    assert_eq!(device.region_writes().len(), 0);
    for y in 0..=2 {
        for x in 16..=19 {
            assert_eq!(device.pixel(x, y), Some(Rgb565::GREEN.to_wire()));
        }
    }
    assert_eq!(device.pixel(15, 0), None);
    assert_eq!(device.pixel(16, 3), None);
}

#[test]
fn fill_solid_outside_panel_does_nothing() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let mut target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();

    target
        .fill_solid(
            &Rectangle::new(Point::new(40, 40), Size::new(4, 4)),
            Rgb565::GREEN,
        )
        .unwrap();
    assert!(target.cache().device().calls().is_empty());
}

#[test]
fn clear_paints_every_pixel() {
    let mut storage = [0u8; 32];
    let cache = WriteCache::<_, 1>::new(panel(), PixelFormat::Rgb565, [&mut storage[..]]).unwrap();
    let mut target = CacheDrawTarget::<_, Rgb565, 1>::new(cache).unwrap();

    target.clear(Rgb565::CYAN).unwrap();
    let wire = Rgb565::CYAN.to_wire();
    assert!(target
        .cache()
        .device()
        .screen()
        .iter()
        .all(|px| *px == Some(wire)));
}
