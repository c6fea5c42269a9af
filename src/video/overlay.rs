// Overlay buffer - Game overlay converted from 8-bit palette to RGBA
//
// Written from game logic and read by the presenter on the same thread,
// so the dirty state is plain fields.

use super::palette::IndexedSurface;
use super::surface::Surface;
use crate::render::Rect;

/// Full-size RGBA copy of the game overlay
#[derive(Debug, Clone)]
pub struct OverlayBuffer {
    surface: Surface,
    dirty: Rect,
    needs_update: bool,
}

impl OverlayBuffer {
    /// Create a buffer of the game's overlay dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            dirty: Rect::default(),
            needs_update: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Whether the game uses an overlay at all
    pub fn has_area(&self) -> bool {
        self.surface.width() > 0 && self.surface.height() > 0
    }

    /// Convert an indexed surface and place it at `(x, y)`
    ///
    /// Every source pixel becomes `R<<24 | G<<16 | B<<8 | A` through the
    /// source palette. The written region becomes the dirty rectangle.
    ///
    /// # Arguments
    /// * `source` - 8-bit indexed surface from game logic
    /// * `x`, `y` - Destination position in the overlay
    pub fn convert(&mut self, source: &IndexedSurface, x: i32, y: i32) {
        let (sw, sh) = (source.width(), source.height());
        let palette = source.palette();
        let indices = source.indices();
        let (bw, bh) = (self.surface.width() as i32, self.surface.height() as i32);
        let pitch = self.surface.pitch();
        let pixels = self.surface.pixels_mut();

        for sy in 0..sh as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= bh {
                continue;
            }
            let src_row = &indices[(sy as u32 * sw) as usize..((sy as u32 + 1) * sw) as usize];
            for (sx, &index) in src_row.iter().enumerate() {
                let dx = x + sx as i32;
                if dx < 0 || dx >= bw {
                    continue;
                }
                pixels[dy as usize * pitch + dx as usize] = palette.rgba8888(index);
            }
        }

        self.dirty = Rect::new(x, y, sw, sh);
        self.needs_update = true;
    }

    /// Region written by the last conversion
    pub fn dirty_rect(&self) -> Rect {
        self.dirty
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Hand the dirty region to the uploader and clear the flag
    ///
    /// # Returns
    /// `(dirty rect, pixels, pitch in words)` when an update is pending
    pub fn take_update(&mut self) -> Option<(Rect, &[u32], usize)> {
        if !self.needs_update {
            return None;
        }
        self.needs_update = false;
        Some((self.dirty, self.surface.pixels(), self.surface.pitch()))
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::palette::Palette;

    fn source() -> IndexedSurface {
        let mut palette = Palette::new();
        palette.set_rgb(1, 0xFF, 0x00, 0x00);
        palette.set_transparent(0, true);
        let mut surface = IndexedSurface::new(2, 2, palette);
        surface.set_index(1, 0, 1);
        surface
    }

    #[test]
    fn test_convert_packs_palette_colors() {
        let mut overlay = OverlayBuffer::new(4, 4);
        overlay.convert(&source(), 0, 0);
        assert_eq!(overlay.surface().pixel(0, 0), Some(0x00000000));
        assert_eq!(overlay.surface().pixel(1, 0), Some(0xFF0000FF));
        assert!(overlay.needs_update());
    }

    #[test]
    fn test_convert_records_dirty_rect_at_offset() {
        let mut overlay = OverlayBuffer::new(4, 4);
        overlay.convert(&source(), 2, 1);
        assert_eq!(overlay.dirty_rect(), Rect::new(2, 1, 2, 2));
        assert_eq!(overlay.surface().pixel(3, 1), Some(0xFF0000FF));
    }

    #[test]
    fn test_take_update_clears_flag() {
        let mut overlay = OverlayBuffer::new(4, 4);
        assert!(overlay.take_update().is_none());
        overlay.convert(&source(), 0, 0);
        let (rect, pixels, pitch) = overlay.take_update().unwrap();
        assert_eq!(rect, Rect::new(0, 0, 2, 2));
        assert_eq!(pixels.len(), 16);
        assert_eq!(pitch, 4);
        assert!(!overlay.needs_update());
    }

    #[test]
    fn test_convert_clips_to_buffer() {
        let mut overlay = OverlayBuffer::new(1, 1);
        overlay.convert(&source(), 0, 0);
        assert_eq!(overlay.surface().pixels(), &[0x00000000]);
    }
}
