// LED overlay buffer - Fixed 320x240 buffer for LED digits and player text
//
// Holds the numeric LED strips of scoreboard games, the vendor glyph text
// and small text drawn by `draw_string`. Uploaded into the top-left
// 320x240 region of the overlay texture.

use super::surface::{Surface, COLOR_KEY};
use super::vendor_text;
use crate::display::OverlayAspect;
use crate::render::{Color, Rect};

/// LED buffer width
pub const LED_BUFFER_WIDTH: u32 = 320;

/// LED buffer height
pub const LED_BUFFER_HEIGHT: u32 = 240;

/// Region of the overlay texture the LED buffer occupies
pub const LED_RECT: Rect = Rect::sized(LED_BUFFER_WIDTH, LED_BUFFER_HEIGHT);

/// Width of one digit in the LED glyph strip
pub const OVERLAY_LED_WIDTH: u32 = 8;

/// Height of the LED glyph strip
pub const OVERLAY_LED_HEIGHT: u32 = 13;

/// Vendor character-map cell size
pub const VENDOR_GLYPH_SIZE: u32 = 16;

/// Horizontal advance between vendor glyphs
pub const VENDOR_GLYPH_SPACING: i32 = 15;

/// Height cleared by `draw_text`
pub const TEXT_ROW_HEIGHT: u32 = 14;

/// Width cleared per character by `draw_text`
pub const TEXT_CHAR_WIDTH: u32 = 6;

/// 320x240 RGBA buffer for LED digits and vendor glyphs
#[derive(Debug, Clone)]
pub struct LedOverlayBuffer {
    surface: Surface,
    needs_update: bool,
}

impl LedOverlayBuffer {
    pub fn new() -> Self {
        Self {
            surface: Surface::new(LED_BUFFER_WIDTH, LED_BUFFER_HEIGHT),
            needs_update: false,
        }
    }

    /// Draw LED digits side by side
    ///
    /// Each destination cell is cleared before the glyph is blitted: the
    /// strip's color key leaves black texels untouched, so segments of the
    /// previous digit would otherwise remain.
    ///
    /// # Arguments
    /// * `strip` - LED glyph strip, digit `n` at `x = n * 8`
    /// * `values` - Digit values, one glyph each
    /// * `start_x`, `y` - Position of the first digit
    pub fn draw_digits(&mut self, strip: &Surface, values: &[u32], start_x: i32, y: i32) {
        let mut x = start_x;
        for &value in values {
            let cell = Rect::new(x, y, OVERLAY_LED_WIDTH, OVERLAY_LED_HEIGHT);
            let glyph = Rect::new(
                (value * OVERLAY_LED_WIDTH) as i32,
                0,
                OVERLAY_LED_WIDTH,
                OVERLAY_LED_HEIGHT,
            );
            self.surface.fill_rect(cell, Color::TRANSPARENT);
            self.surface.blit(strip, Some(glyph), x, y, Some(COLOR_KEY));
            x += OVERLAY_LED_WIDTH as i32;
        }
        self.needs_update = true;
    }

    /// Draw one vendor text line through the character-map bitmap
    ///
    /// Does not mark the buffer dirty: while glyph text is active the
    /// presenter re-uploads the LED region every frame.
    pub fn draw_glyph_line(
        &mut self,
        charmap: &Surface,
        text: &[u8],
        start_x: i32,
        y: i32,
        aspect: OverlayAspect,
    ) {
        let mut x = match aspect {
            OverlayAspect::Ratio150 => start_x - start_x / 4,
            _ => start_x,
        };

        for glyph in vendor_text::line_glyphs(text) {
            let cell = Rect::new(x, y, VENDOR_GLYPH_SIZE, VENDOR_GLYPH_SIZE);
            let src = Rect::new(
                glyph as i32 * VENDOR_GLYPH_SIZE as i32,
                0,
                VENDOR_GLYPH_SIZE,
                VENDOR_GLYPH_SIZE,
            );
            self.surface.fill_rect(cell, Color::TRANSPARENT);
            self.surface.blit(charmap, Some(src), x, y, Some(COLOR_KEY));
            x += VENDOR_GLYPH_SPACING;
        }
    }

    /// Place rasterised text, clearing `6 * chars` × 14 pixels first
    pub fn draw_text(&mut self, rendered: &Surface, chars: usize, x: i32, y: i32) {
        let area = Rect::new(x, y, TEXT_CHAR_WIDTH * chars as u32, TEXT_ROW_HEIGHT);
        self.surface.fill_rect(area, Color::TRANSPARENT);
        self.surface
            .blit(rendered, None, x, y, Some(Color::TRANSPARENT.to_rgba8888()));
        self.needs_update = true;
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Hand the LED region to the uploader and clear the flag
    pub fn take_update(&mut self) -> Option<(Rect, &[u32], usize)> {
        if !self.needs_update {
            return None;
        }
        self.needs_update = false;
        Some(self.region())
    }

    /// The LED region, regardless of the dirty flag
    pub fn region(&self) -> (Rect, &[u32], usize) {
        (LED_RECT, self.surface.pixels(), self.surface.pitch())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl Default for LedOverlayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFF0000FF;

    /// Strip of 10 digits; digit n lights the first n+1 texels of row 0
    fn strip() -> Surface {
        let mut s = Surface::from_pixels(
            OVERLAY_LED_WIDTH * 10,
            OVERLAY_LED_HEIGHT,
            vec![COLOR_KEY; (OVERLAY_LED_WIDTH * 10 * OVERLAY_LED_HEIGHT) as usize],
        )
        .unwrap();
        for digit in 0..10 {
            for x in 0..=digit.min(OVERLAY_LED_WIDTH - 1) {
                s.set_pixel(digit * OVERLAY_LED_WIDTH + x, 0, RED);
            }
        }
        s
    }

    #[test]
    fn test_draw_digits_marks_dirty() {
        let mut leds = LedOverlayBuffer::new();
        leds.draw_digits(&strip(), &[1, 2], 16, 20);
        assert!(leds.needs_update());
        assert_eq!(leds.surface().pixel(16, 20), Some(RED));
        assert_eq!(leds.surface().pixel(17, 20), Some(RED));
        assert_eq!(leds.surface().pixel(18, 20), Some(0));
        assert_eq!(leds.surface().pixel(24 + 2, 20), Some(RED));
    }

    #[test]
    fn test_draw_digits_is_idempotent() {
        let mut once = LedOverlayBuffer::new();
        once.draw_digits(&strip(), &[3, 1, 4], 0, 0);

        let mut twice = LedOverlayBuffer::new();
        twice.draw_digits(&strip(), &[3, 1, 4], 0, 0);
        twice.draw_digits(&strip(), &[3, 1, 4], 0, 0);

        assert_eq!(once.surface(), twice.surface());
    }

    #[test]
    fn test_draw_digits_no_bleed_through() {
        let mut leds = LedOverlayBuffer::new();
        leds.draw_digits(&strip(), &[8], 0, 0);
        leds.draw_digits(&strip(), &[0], 0, 0);

        let mut fresh = LedOverlayBuffer::new();
        fresh.draw_digits(&strip(), &[0], 0, 0);
        assert_eq!(leds.surface(), fresh.surface());
    }

    #[test]
    fn test_take_update_returns_led_region() {
        let mut leds = LedOverlayBuffer::new();
        assert!(leds.take_update().is_none());
        leds.draw_digits(&strip(), &[0], 0, 0);
        let (rect, pixels, pitch) = leds.take_update().unwrap();
        assert_eq!(rect, LED_RECT);
        assert_eq!(pixels.len(), (320 * 240) as usize);
        assert_eq!(pitch, 320);
        assert!(!leds.needs_update());
    }

    #[test]
    fn test_glyph_line_aspect_shift() {
        let charmap = Surface::from_pixels(
            VENDOR_GLYPH_SIZE * 0x33,
            VENDOR_GLYPH_SIZE,
            vec![RED; (VENDOR_GLYPH_SIZE * 0x33 * VENDOR_GLYPH_SIZE) as usize],
        )
        .unwrap();

        let mut leds = LedOverlayBuffer::new();
        leds.draw_glyph_line(&charmap, b"A", 40, 0, OverlayAspect::Ratio150);
        assert_eq!(leds.surface().pixel(30, 0), Some(RED));
        assert_eq!(leds.surface().pixel(29, 0), Some(0));
        assert!(!leds.needs_update());
    }

    #[test]
    fn test_draw_text_clears_area() {
        let mut leds = LedOverlayBuffer::new();
        leds.draw_digits(&strip(), &[9, 9], 0, 0);
        let rendered = Surface::new(1, 1);
        leds.draw_text(&rendered, 2, 0, 0);
        assert!(leds.surface().pixels()[..12].iter().all(|&p| p == 0));
    }
}
