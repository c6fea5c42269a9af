// Scanlines - Fixed CRT scanline pattern drawn over the composed frame
//
// Every 5-row band gets four lines with a rising grey ramp and one
// untouched row. With MOD draw blending the grey darkens the image.

use crate::render::{Color, Renderer};

/// Rows per scanline band
pub const BAND_HEIGHT: u32 = 5;

/// Grey level of the first four rows of each band
pub const RAMP: [u8; 4] = [0x40, 0x90, 0xB0, 0xD0];

/// Draw the scanline pattern across `width`×`height`
///
/// Leaves the draw color opaque black.
pub fn draw_scanlines(renderer: &mut dyn Renderer, width: u32, height: u32) {
    for band in (0..height).step_by(BAND_HEIGHT as usize) {
        for (offset, &level) in RAMP.iter().enumerate() {
            let y = (band + offset as u32) as i32;
            renderer.set_draw_color(Color::grey(level));
            renderer.draw_line(0, y, width as i32, y);
        }
    }
    renderer.set_draw_color(Color::BLACK);
}
