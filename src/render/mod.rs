// Render module - The renderer abstraction the compositor draws through
//
// This module provides:
// - The `Renderer` trait (textures, copies, lines, clear, present, readback)
// - A CPU implementation, `SoftwareRenderer`, used off-screen and behind the
//   real window
// - Small shared types (rectangles, colors, texture handles)
//
// GPU resources are not shared across threads: a renderer and every texture
// it hands out belong to the presentation thread.

pub mod software;
pub mod types;

pub use software::SoftwareRenderer;
pub use types::{
    BlendMode, Color, PixelFormat, Rect, RenderStats, ScaleQuality, TextureId, YuvPlanes,
};

use thiserror::Error;

/// Errors reported by a renderer
#[derive(Debug, Error)]
pub enum RenderError {
    /// Texture could not be created
    #[error("could not create {format:?} texture {width}x{height}: {reason}")]
    TextureCreation {
        format: PixelFormat,
        width: u32,
        height: u32,
        reason: String,
    },

    /// Handle does not name a live texture
    #[error("invalid texture handle {0:?}")]
    InvalidTexture(TextureId),

    /// Operation does not apply to the texture's pixel format
    #[error("texture {id:?} has format {actual:?}, expected {expected:?}")]
    WrongFormat {
        id: TextureId,
        expected: PixelFormat,
        actual: PixelFormat,
    },

    /// Source data is smaller than the region being updated
    #[error("pixel data too small: need {needed} elements, got {actual}")]
    ShortBuffer { needed: usize, actual: usize },

    /// Reading back the render target failed
    #[error("could not read pixels: {0}")]
    ReadPixels(String),

    /// Presenting to the output surface failed
    #[error("present failed: {0}")]
    Present(String),
}

/// A frame read back from a render target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub width: u32,
    pub height: u32,
    /// RGBA8888 words, row-major, `width` words per row
    pub pixels: Vec<u32>,
}

impl Capture {
    /// Convert to tightly packed RGB bytes (3 bytes per pixel)
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for &word in &self.pixels {
            let c = Color::from_rgba8888(word);
            rgb.push(c.r);
            rgb.push(c.g);
            rgb.push(c.b);
        }
        rgb
    }
}

/// 2D renderer with texture management
///
/// The operations follow the usual accelerated 2D API shape: textures are
/// created with a fixed format and size, updated from CPU memory, copied
/// (optionally scaled) onto the render target, and the target is presented.
pub trait Renderer {
    /// Create a texture
    fn create_texture(
        &mut self,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TextureId, RenderError>;

    /// Destroy a texture; unknown handles are ignored
    fn destroy_texture(&mut self, id: TextureId);

    /// Size of a live texture
    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)>;

    /// Set how a texture blends when copied
    fn set_texture_blend_mode(&mut self, id: TextureId, mode: BlendMode)
        -> Result<(), RenderError>;

    /// Update a region of an RGBA texture
    ///
    /// `pixels` holds RGBA8888 words, `pitch` is the number of words per
    /// source row. The source region starts at `(rect.x, rect.y)` in
    /// `pixels` as well, so a full-size backing buffer can be passed
    /// together with the dirty rectangle. `None` updates the whole texture.
    fn update_texture(
        &mut self,
        id: TextureId,
        rect: Option<Rect>,
        pixels: &[u32],
        pitch: usize,
    ) -> Result<(), RenderError>;

    /// Replace the contents of a YUV texture
    fn update_yuv_texture(&mut self, id: TextureId, planes: YuvPlanes<'_>)
        -> Result<(), RenderError>;

    /// Copy (and scale) a texture region onto the render target
    ///
    /// `None` for `src` means the whole texture, `None` for `dst` means the
    /// whole target.
    fn copy(
        &mut self,
        id: TextureId,
        src: Option<Rect>,
        dst: Option<Rect>,
    ) -> Result<(), RenderError>;

    /// Set the color used by clear and draw operations
    fn set_draw_color(&mut self, color: Color);

    /// Set the blend mode used by draw operations (not by clear)
    fn set_draw_blend_mode(&mut self, mode: BlendMode);

    /// Current draw blend mode
    fn draw_blend_mode(&self) -> BlendMode;

    /// Fill the whole target with the draw color
    fn clear(&mut self);

    /// Draw a line with the draw color (inclusive end points)
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Fill a rectangle with the draw color
    fn fill_rect(&mut self, rect: Rect);

    /// Set the device-independent resolution used for rendering
    fn set_logical_size(&mut self, width: u32, height: u32);

    /// Size of the render target in logical pixels
    fn output_size(&self) -> (u32, u32);

    /// Filtering hint for scaling the logical target to the output
    fn set_scale_quality(&mut self, quality: ScaleQuality);

    /// Filtering currently requested
    fn scale_quality(&self) -> ScaleQuality {
        ScaleQuality::Nearest
    }

    /// Show the composed frame
    fn present(&mut self) -> Result<(), RenderError>;

    /// The output surface changed size (window resize, fullscreen switch)
    fn window_resized(&mut self, _width: u32, _height: u32) {}

    /// Read back the last composed target
    fn read_pixels(&self) -> Result<Capture, RenderError>;

    /// Work counters, when the backend keeps them
    fn stats(&self) -> RenderStats {
        RenderStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_to_rgb_bytes() {
        let capture = Capture {
            width: 2,
            height: 1,
            pixels: vec![0x112233FF, 0xAABBCC00],
        };
        assert_eq!(
            capture.to_rgb_bytes(),
            vec![0x11, 0x22, 0x33, 0xAA, 0xBB, 0xCC]
        );
    }
}
