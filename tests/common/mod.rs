// Common test utilities for compositor integration tests
//
// This module provides shared setup for running the display context
// against the headless window system.

#![allow(dead_code)]

use hypseus_video::display::{DisplayOptions, HeadlessWindowSystem};
use hypseus_video::render::{Capture, Color};
use hypseus_video::video::{Assets, DisplayContext, Surface, TestFrame};
use std::path::Path;

/// Resolution of the synthetic laserdisc stream
pub const VIDEO_WIDTH: u32 = 720;
pub const VIDEO_HEIGHT: u32 = 480;

/// Open a context on a fresh headless window system
pub fn open_context(options: DisplayOptions, overlay: (u32, u32)) -> DisplayContext {
    let mut system = HeadlessWindowSystem::new();
    let mut context = DisplayContext::new(options, overlay.0, overlay.1);
    context
        .open(&mut system)
        .expect("headless display should open");
    context
}

/// Options that write screenshots into `dir`
pub fn options_with_screenshots(dir: &Path) -> DisplayOptions {
    let mut options = DisplayOptions::new();
    options.screenshot_dir = dir.to_path_buf();
    options
}

/// Feed one colour-bar frame through the context's YUV buffer
pub fn feed_color_bars(context: &DisplayContext, offset: u32) {
    let frame = TestFrame::color_bars(VIDEO_WIDTH, VIDEO_HEIGHT, offset);
    let (yp, up, vp) = frame.pitches();
    context
        .update_yuv(&frame.y, &frame.u, &frame.v, yp, up, vp)
        .expect("frame should fit the buffer");
}

/// LED strip with 16 distinguishable digits
///
/// Digit `n` is a solid block of grey level `n * 16 + 15`, with a black
/// (color-keyed) top row.
pub fn led_strip() -> Surface {
    let mut strip = Surface::new(8 * 16, 13);
    for digit in 0..16u32 {
        let level = (digit * 16 + 15) as u8;
        for y in 1..13 {
            for x in 0..8 {
                strip.set_pixel(digit * 8 + x, y, Color::grey(level).to_rgba8888());
            }
        }
        for x in 0..8 {
            strip.set_pixel(digit * 8 + x, 0, Color::BLACK.to_rgba8888());
        }
    }
    strip
}

/// Assets with only the LED strip
pub fn led_assets() -> Assets {
    let mut assets = Assets::empty();
    assets.set_led_strip(led_strip());
    assets
}

/// Last presented frame
pub fn capture(context: &DisplayContext) -> Capture {
    context
        .renderer()
        .expect("context should be open")
        .read_pixels()
        .expect("software readback cannot fail")
}
