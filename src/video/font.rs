// Fonts - Text drawing service used for subtitles and overlay text
//
// The compositor only needs two things from a font library: draw a string
// onto the render target, and rasterise a string into a surface. The
// built-in `BitmapFont` does both with a scaled 8x8 monospace font.

use super::surface::Surface;
use crate::display::OverlayAspect;
use crate::render::{BlendMode, Color, Rect, Renderer};

/// Which of the compositor's fonts to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// Subtitle font
    Subtitle,
    /// Fixed-width font for vendor text rows
    Fixed,
    /// Small font for `draw_string`
    Text,
}

/// Point sizes of the three fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizes {
    pub subtitle: u32,
    pub fixed: u32,
    pub text: u32,
}

impl FontSizes {
    /// Sizes derived from the draw width
    ///
    /// # Arguments
    /// * `draw_width` - Output width in pixels
    /// * `aspect` - Overlay aspect; the 0xB1 layout uses a narrower fixed font
    /// * `glyph_style` - Vendor text drawn through glyphs (smaller text font)
    pub fn for_display(draw_width: u32, aspect: OverlayAspect, glyph_style: bool) -> Self {
        let fixed = match aspect {
            OverlayAspect::Ratio177 => draw_width / 24,
            _ => draw_width / 18,
        };

        Self {
            subtitle: draw_width / 36,
            fixed,
            text: if glyph_style { 12 } else { 14 },
        }
    }

    pub fn size(&self, kind: FontKind) -> u32 {
        match kind {
            FontKind::Subtitle => self.subtitle,
            FontKind::Fixed => self.fixed,
            FontKind::Text => self.text,
        }
    }
}

/// Text drawing service
pub trait FontService {
    /// Draw `text` onto the render target with its top-left at `(x, y)`
    fn draw_text(&mut self, renderer: &mut dyn Renderer, kind: FontKind, x: i32, y: i32, text: &str);

    /// Rasterise `text` into a surface with a transparent background
    fn render_text(&mut self, kind: FontKind, text: &str, color: Color) -> Surface;
}

/// Glyph edge in font pixels
pub const GLYPH_SIZE: u32 = 8;

// Index layout: 0-25 A-Z, 26-35 0-9, then space . : / - > _ ! ? ' ,
const GLYPH_COUNT: usize = 47;

#[rustfmt::skip]
static GLYPHS: [[u8; 8]; GLYPH_COUNT] = [
    [0x18, 0x3C, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x00], // A
    [0x7C, 0x66, 0x66, 0x7C, 0x66, 0x66, 0x7C, 0x00], // B
    [0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00], // C
    [0x78, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0x78, 0x00], // D
    [0x7E, 0x60, 0x60, 0x7C, 0x60, 0x60, 0x7E, 0x00], // E
    [0x7E, 0x60, 0x60, 0x7C, 0x60, 0x60, 0x60, 0x00], // F
    [0x3C, 0x66, 0x60, 0x6E, 0x66, 0x66, 0x3C, 0x00], // G
    [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00], // H
    [0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00], // I
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x6C, 0x38, 0x00], // J
    [0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00], // K
    [0x60, 0x60, 0x60, 0x60, 0x60, 0x60, 0x7E, 0x00], // L
    [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00], // M
    [0x66, 0x76, 0x7E, 0x7E, 0x6E, 0x66, 0x66, 0x00], // N
    [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // O
    [0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00], // P
    [0x3C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x0E, 0x00], // Q
    [0x7C, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x00], // R
    [0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00], // S
    [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00], // T
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // U
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00], // V
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // W
    [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00], // X
    [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00], // Y
    [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x7E, 0x00], // Z
    [0x3C, 0x66, 0x6E, 0x76, 0x66, 0x66, 0x3C, 0x00], // 0
    [0x18, 0x38, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00], // 1
    [0x3C, 0x66, 0x06, 0x0C, 0x30, 0x60, 0x7E, 0x00], // 2
    [0x3C, 0x66, 0x06, 0x1C, 0x06, 0x66, 0x3C, 0x00], // 3
    [0x06, 0x0E, 0x1E, 0x66, 0x7F, 0x06, 0x06, 0x00], // 4
    [0x7E, 0x60, 0x7C, 0x06, 0x06, 0x66, 0x3C, 0x00], // 5
    [0x3C, 0x66, 0x60, 0x7C, 0x66, 0x66, 0x3C, 0x00], // 6
    [0x7E, 0x66, 0x0C, 0x18, 0x18, 0x18, 0x18, 0x00], // 7
    [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00], // 8
    [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x66, 0x3C, 0x00], // 9
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00], // .
    [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00, 0x00], // :
    [0x02, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // /
    [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00], // -
    [0x30, 0x18, 0x0C, 0x06, 0x0C, 0x18, 0x30, 0x00], // >
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7E, 0x00], // _
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x3C, 0x66, 0x06, 0x0C, 0x18, 0x00, 0x18, 0x00], // ?
    [0x18, 0x18, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30], // ,
];

const SPACE: usize = 36;

/// Glyph rows for a character; unknown characters are blank
pub fn glyph_rows(ch: char) -> &'static [u8; 8] {
    let index = match ch {
        'A'..='Z' => ch as usize - 'A' as usize,
        'a'..='z' => ch as usize - 'a' as usize,
        '0'..='9' => ch as usize - '0' as usize + 26,
        '.' => 37,
        ':' => 38,
        '/' => 39,
        '-' => 40,
        '>' => 41,
        '_' => 42,
        '!' => 43,
        '?' => 44,
        '\'' => 45,
        ',' => 46,
        _ => SPACE,
    };
    &GLYPHS[index]
}

/// Built-in scaled bitmap font
#[derive(Debug, Clone)]
pub struct BitmapFont {
    sizes: FontSizes,
    color: Color,
}

impl BitmapFont {
    pub fn new(sizes: FontSizes) -> Self {
        Self {
            sizes,
            color: Color::WHITE,
        }
    }

    /// Screen pixels per font pixel for a font
    pub fn scale(&self, kind: FontKind) -> u32 {
        (self.sizes.size(kind) / GLYPH_SIZE).max(1)
    }

    pub fn sizes(&self) -> FontSizes {
        self.sizes
    }

    /// Set the color used by `draw_text`
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn each_pixel(&self, kind: FontKind, text: &str, mut plot: impl FnMut(u32, u32, u32)) {
        let scale = self.scale(kind);
        for (i, ch) in text.chars().enumerate() {
            let origin = i as u32 * GLYPH_SIZE * scale;
            for (row, bits) in glyph_rows(ch).iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (0x80 >> col) != 0 {
                        plot(origin + col * scale, row as u32 * scale, scale);
                    }
                }
            }
        }
    }
}

impl FontService for BitmapFont {
    fn draw_text(&mut self, renderer: &mut dyn Renderer, kind: FontKind, x: i32, y: i32, text: &str) {
        // Text is drawn opaque even when scanlines switched drawing to MOD
        let blend = renderer.draw_blend_mode();
        renderer.set_draw_blend_mode(BlendMode::None);
        renderer.set_draw_color(self.color);

        self.each_pixel(kind, text, |px, py, scale| {
            renderer.fill_rect(Rect::new(x + px as i32, y + py as i32, scale, scale));
        });

        renderer.set_draw_color(Color::BLACK);
        renderer.set_draw_blend_mode(blend);
    }

    fn render_text(&mut self, kind: FontKind, text: &str, color: Color) -> Surface {
        let scale = self.scale(kind);
        let chars = text.chars().count() as u32;
        let mut surface = Surface::new(chars * GLYPH_SIZE * scale, GLYPH_SIZE * scale);

        let word = color.to_rgba8888();
        self.each_pixel(kind, text, |px, py, scale| {
            for dy in 0..scale {
                for dx in 0..scale {
                    surface.set_pixel(px + dx, py + dy, word);
                }
            }
        });
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareRenderer;

    #[test]
    fn test_font_sizes() {
        let sizes = FontSizes::for_display(720, OverlayAspect::Standard, false);
        assert_eq!(sizes.subtitle, 20);
        assert_eq!(sizes.fixed, 40);
        assert_eq!(sizes.text, 14);

        let sizes = FontSizes::for_display(720, OverlayAspect::Ratio177, true);
        assert_eq!(sizes.fixed, 30);
        assert_eq!(sizes.text, 12);
    }

    #[test]
    fn test_unknown_glyph_is_blank() {
        assert_eq!(glyph_rows('~'), &[0; 8]);
        assert_eq!(glyph_rows('a'), glyph_rows('A'));
    }

    #[test]
    fn test_render_text_size_and_pixels() {
        let sizes = FontSizes {
            subtitle: 16,
            fixed: 8,
            text: 8,
        };
        let mut font = BitmapFont::new(sizes);
        let surface = font.render_text(FontKind::Text, "-", Color::WHITE);
        assert_eq!((surface.width(), surface.height()), (8, 8));
        assert_eq!(surface.pixel(1, 3), Some(0xFFFFFFFF));
        assert_eq!(surface.pixel(1, 2), Some(0));

        let surface = font.render_text(FontKind::Subtitle, "AB", Color::WHITE);
        assert_eq!((surface.width(), surface.height()), (32, 16));
    }

    #[test]
    fn test_draw_text_restores_renderer_state() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        renderer.set_draw_blend_mode(BlendMode::Mod);
        let mut font = BitmapFont::new(FontSizes::for_display(144, OverlayAspect::Standard, false));
        font.draw_text(&mut renderer, FontKind::Text, 0, 0, "-");

        assert_eq!(renderer.draw_blend_mode(), BlendMode::Mod);
        assert_eq!(renderer.target_pixel(1, 3), Some(Color::WHITE));
    }
}
