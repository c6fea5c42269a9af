// Surface - CPU-side RGBA pixel buffers
//
// Used for the overlay and LED buffers and for decoded bitmap assets.
// Pixels are RGBA8888 words, red in the most significant byte.

use crate::render::{Color, Rect};

/// Color key used by glyph bitmaps: opaque black texels are not copied
pub const COLOR_KEY: u32 = 0x0000_00FF;

/// RGBA software surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Surface {
    /// Create a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT.to_rgba8888(); (width * height) as usize],
        }
    }

    /// Wrap existing RGBA words; `None` when the length does not match
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Words per row
    pub fn pitch(&self) -> usize {
        self.width as usize
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Read one pixel; `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Write one pixel; ignored outside the surface
    pub fn set_pixel(&mut self, x: u32, y: u32, word: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = word;
        }
    }

    /// Fill the whole surface
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_rgba8888());
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = rect.clip_to(self.width, self.height) else {
            return;
        };
        let word = color.to_rgba8888();
        for y in r.y as u32..r.y as u32 + r.h {
            let start = (y * self.width + r.x as u32) as usize;
            self.pixels[start..start + r.w as usize].fill(word);
        }
    }

    /// Copy a region of `src` to `(dst_x, dst_y)`, skipping texels equal to `key`
    ///
    /// # Arguments
    /// * `src` - Source surface
    /// * `src_rect` - Region of the source (`None` = whole surface)
    /// * `dst_x`, `dst_y` - Destination position (may be partly outside)
    /// * `key` - Color key; `None` copies every texel
    pub fn blit(
        &mut self,
        src: &Surface,
        src_rect: Option<Rect>,
        dst_x: i32,
        dst_y: i32,
        key: Option<u32>,
    ) {
        let Some(s) = src_rect
            .unwrap_or(Rect::sized(src.width, src.height))
            .clip_to(src.width, src.height)
        else {
            return;
        };

        for row in 0..s.h as i32 {
            let dy = dst_y + row;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for col in 0..s.w as i32 {
                let dx = dst_x + col;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let word = src.pixels[((s.y + row) as u32 * src.width + (s.x + col) as u32) as usize];
                if key == Some(word) {
                    continue;
                }
                self.pixels[(dy as u32 * self.width + dx as u32) as usize] = word;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(4, 3);
        assert_eq!(surface.pixels().len(), 12);
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Surface::from_pixels(2, 2, vec![0; 3]).is_none());
        assert!(Surface::from_pixels(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = Surface::new(4, 4);
        surface.fill_rect(Rect::new(2, 2, 10, 10), Color::WHITE);
        assert_eq!(surface.pixel(3, 3), Some(0xFFFFFFFF));
        assert_eq!(surface.pixel(1, 1), Some(0));
    }

    #[test]
    fn test_blit_skips_color_key() {
        let src = Surface::from_pixels(2, 1, vec![COLOR_KEY, 0xFF0000FF]).unwrap();
        let mut dst = Surface::new(2, 1);
        dst.fill(Color::WHITE);
        dst.blit(&src, None, 0, 0, Some(COLOR_KEY));
        assert_eq!(dst.pixels(), &[0xFFFFFFFF, 0xFF0000FF]);
    }

    #[test]
    fn test_blit_partially_outside() {
        let src = Surface::from_pixels(2, 2, vec![1, 2, 3, 4]).unwrap();
        let mut dst = Surface::new(2, 2);
        dst.blit(&src, None, -1, 1, None);
        assert_eq!(dst.pixels(), &[0, 0, 2, 0]);
    }

    #[test]
    fn test_blit_source_rect() {
        let src = Surface::from_pixels(3, 1, vec![1, 2, 3]).unwrap();
        let mut dst = Surface::new(1, 1);
        dst.blit(&src, Some(Rect::new(2, 0, 1, 1)), 0, 0, None);
        assert_eq!(dst.pixels(), &[3]);
    }
}
