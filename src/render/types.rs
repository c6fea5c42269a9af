// Render types - Rectangles, colors, texture handles and formats
//
// These mirror the small vocabulary a 2D GPU renderer API exposes:
// integer rectangles, an RGBA draw color, opaque texture handles,
// blend modes and texture pixel formats.

/// Integer rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin
    pub const fn sized(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Whether the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Intersect with a `width`×`height` area anchored at the origin
    ///
    /// Returns `None` if nothing of the rectangle lies inside the area.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = (self.x as i64 + self.w as i64).min(width as i64);
        let y1 = (self.y as i64 + self.h as i64).min(height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Rect::new(
            x0 as i32,
            y0 as i32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

/// RGBA color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color::rgba(0, 0, 0, 0xFF);

    /// Fully transparent black
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque white
    pub const WHITE: Color = Color::rgba(0xFF, 0xFF, 0xFF, 0xFF);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey level
    pub const fn grey(level: u8) -> Self {
        Self::rgba(level, level, level, 0xFF)
    }

    /// Pack into an RGBA8888 word (R in the most significant byte)
    #[inline]
    pub const fn to_rgba8888(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    /// Unpack from an RGBA8888 word
    #[inline]
    pub const fn from_rgba8888(word: u32) -> Self {
        Self::rgba(
            (word >> 24) as u8,
            (word >> 16) as u8,
            (word >> 8) as u8,
            word as u8,
        )
    }
}

/// Opaque handle to a texture owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

/// Texture pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 32-bit RGBA, red in the most significant byte
    Rgba8888,
    /// Planar 4:2:0 YUV (Y, then U and V at half width and half height)
    Yv12,
}

/// How source pixels combine with the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Overwrite the destination
    #[default]
    None,
    /// Straight-alpha "over" blending
    Blend,
    /// Multiply the destination color by the source color
    Mod,
}

/// Texture filtering used when the logical size differs from the output size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleQuality {
    #[default]
    Nearest,
    Linear,
}

/// Borrowed YUV planes with their row pitches in bytes
#[derive(Debug, Clone, Copy)]
pub struct YuvPlanes<'a> {
    pub y: &'a [u8],
    pub u: &'a [u8],
    pub v: &'a [u8],
    pub y_pitch: usize,
    pub u_pitch: usize,
    pub v_pitch: usize,
}

/// Statistics a renderer keeps about its own work
///
/// Used to observe how much data crossed into textures during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of RGBA texture updates
    pub texture_uploads: u64,
    /// Number of YUV texture updates
    pub yuv_uploads: u64,
    /// Number of texture copies to the target
    pub copies: u64,
    /// Number of presented frames
    pub presents: u64,
    /// Number of textures created over the renderer's lifetime
    pub textures_created: u64,
    /// Number of textures destroyed over the renderer's lifetime
    pub textures_destroyed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_rgba8888(), 0x12345678);
        assert_eq!(Color::from_rgba8888(0x12345678), c);
    }

    #[test]
    fn test_rect_clip_inside() {
        let r = Rect::new(10, 10, 20, 20);
        assert_eq!(r.clip_to(100, 100), Some(r));
    }

    #[test]
    fn test_rect_clip_partial() {
        let r = Rect::new(-5, 90, 20, 20);
        assert_eq!(r.clip_to(100, 100), Some(Rect::new(0, 90, 15, 10)));
    }

    #[test]
    fn test_rect_clip_outside() {
        assert_eq!(Rect::new(200, 0, 10, 10).clip_to(100, 100), None);
        assert_eq!(Rect::new(0, 0, 0, 10).clip_to(100, 100), None);
    }
}
