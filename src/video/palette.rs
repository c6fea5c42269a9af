// Overlay palette - 256-entry RGBA palette and 8-bit indexed surfaces
//
// Game overlays are drawn with 8-bit palette indices. Some entries are
// designated transparent (alpha 0) so the video shows through.

use crate::render::Color;

/// Number of entries in an overlay palette
pub const PALETTE_SIZE: usize = 256;

/// Overlay color palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Color; PALETTE_SIZE],
}

impl Palette {
    /// Create a palette with every entry opaque black
    pub fn new() -> Self {
        Self {
            entries: [Color::BLACK; PALETTE_SIZE],
        }
    }

    /// Set an opaque color
    pub fn set_rgb(&mut self, index: u8, r: u8, g: u8, b: u8) {
        self.entries[index as usize] = Color::rgba(r, g, b, 0xFF);
    }

    /// Set a color including its alpha
    pub fn set(&mut self, index: u8, color: Color) {
        self.entries[index as usize] = color;
    }

    /// Make an entry transparent (alpha 0) or opaque again
    pub fn set_transparent(&mut self, index: u8, transparent: bool) {
        self.entries[index as usize].a = if transparent { 0x00 } else { 0xFF };
    }

    /// Look up an entry
    #[inline]
    pub fn get(&self, index: u8) -> Color {
        self.entries[index as usize]
    }

    /// Look up an entry as a packed RGBA8888 word
    ///
    /// # Arguments
    /// * `index` - Palette index (0-255)
    ///
    /// # Returns
    /// `R<<24 | G<<16 | B<<8 | A`
    #[inline]
    pub fn rgba8888(&self, index: u8) -> u32 {
        self.entries[index as usize].to_rgba8888()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

/// 8-bit indexed surface as produced by game logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    palette: Palette,
}

impl IndexedSurface {
    /// Create a surface filled with index 0
    pub fn new(width: u32, height: u32, palette: Palette) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
            palette,
        }
    }

    /// Wrap existing indices; `None` when the length does not match
    pub fn from_indices(width: u32, height: u32, pixels: Vec<u8>, palette: Palette) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn indices(&self) -> &[u8] {
        &self.pixels
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Write one index; ignored outside the surface
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = index;
        }
    }

    pub fn fill(&mut self, index: u8) {
        self.pixels.fill(index);
    }
}
