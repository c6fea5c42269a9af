// Software renderer - CPU implementation of the Renderer trait
//
// Textures live in ordinary memory; copies scale with nearest-neighbour
// sampling and YUV textures are converted to RGB (BT.601, limited range)
// as they are sampled. The composed target is kept in a back buffer and
// copied to the front buffer on present, so readback always sees the
// last presented frame.

use super::types::{
    BlendMode, Color, PixelFormat, Rect, RenderStats, ScaleQuality, TextureId, YuvPlanes,
};
use super::{Capture, RenderError, Renderer};
use std::collections::HashMap;

/// Largest texture edge the software renderer accepts
pub const MAX_TEXTURE_SIZE: u32 = 8192;

enum TextureData {
    Rgba(Vec<u32>),
    Yuv { y: Vec<u8>, u: Vec<u8>, v: Vec<u8> },
}

struct Texture {
    format: PixelFormat,
    width: u32,
    height: u32,
    blend: BlendMode,
    data: TextureData,
}

impl Texture {
    fn chroma_size(&self) -> (usize, usize) {
        (
            (self.width as usize).div_ceil(2),
            (self.height as usize).div_ceil(2),
        )
    }

    /// Sample one texel as an RGBA8888 word
    #[inline]
    fn sample(&self, x: u32, y: u32) -> u32 {
        match &self.data {
            TextureData::Rgba(pixels) => pixels[(y * self.width + x) as usize],
            TextureData::Yuv { y: yp, u, v } => {
                let (cw, _) = self.chroma_size();
                let luma = yp[(y * self.width + x) as usize];
                let ci = (y as usize / 2) * cw + x as usize / 2;
                yuv_to_rgba(luma, u[ci], v[ci])
            }
        }
    }

    /// Bilinear sample at `(fx, fy)` relative to `src`, clamped to its edges
    fn sample_linear(&self, src: Rect, fx: f32, fy: f32) -> u32 {
        let max_x = (src.w - 1) as f32;
        let max_y = (src.h - 1) as f32;
        let fx = fx.clamp(0.0, max_x);
        let fy = fy.clamp(0.0, max_y);
        let (x0, y0) = (fx.floor() as u32, fy.floor() as u32);
        let x1 = (x0 + 1).min(src.w - 1);
        let y1 = (y0 + 1).min(src.h - 1);
        let (wx, wy) = (fx - x0 as f32, fy - y0 as f32);

        let (ox, oy) = (src.x as u32, src.y as u32);
        let texel = |x: u32, y: u32| self.sample(ox + x, oy + y);
        let (a, b) = (texel(x0, y0), texel(x1, y0));
        let (c, d) = (texel(x0, y1), texel(x1, y1));

        let mut word = 0u32;
        for shift in [24, 16, 8, 0] {
            let ch = |w: u32| ((w >> shift) & 0xFF) as f32;
            let top = ch(a) + (ch(b) - ch(a)) * wx;
            let bottom = ch(c) + (ch(d) - ch(c)) * wx;
            let value = (top + (bottom - top) * wy).round().clamp(0.0, 255.0) as u32;
            word |= value << shift;
        }
        word
    }
}

/// Convert one BT.601 limited-range YUV sample to an opaque RGBA8888 word
#[inline]
pub fn yuv_to_rgba(y: u8, u: u8, v: u8) -> u32 {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    let r = ((298 * c + 409 * e + 128) >> 8).clamp(0, 255) as u32;
    let g = ((298 * c - 100 * d - 208 * e + 128) >> 8).clamp(0, 255) as u32;
    let b = ((298 * c + 516 * d + 128) >> 8).clamp(0, 255) as u32;

    r << 24 | g << 16 | b << 8 | 0xFF
}

#[inline]
fn blend_word(dst: u32, src: u32, mode: BlendMode) -> u32 {
    match mode {
        BlendMode::None => src,
        BlendMode::Blend => {
            let s = Color::from_rgba8888(src);
            let d = Color::from_rgba8888(dst);
            let a = s.a as u32;
            let inv = 255 - a;
            let mix = |sc: u8, dc: u8| ((sc as u32 * a + dc as u32 * inv + 127) / 255) as u8;
            let out_a = (a + (d.a as u32 * inv + 127) / 255).min(255) as u8;
            Color::rgba(mix(s.r, d.r), mix(s.g, d.g), mix(s.b, d.b), out_a).to_rgba8888()
        }
        BlendMode::Mod => {
            let s = Color::from_rgba8888(src);
            let d = Color::from_rgba8888(dst);
            let m = |sc: u8, dc: u8| ((sc as u32 * dc as u32) / 255) as u8;
            Color::rgba(m(s.r, d.r), m(s.g, d.g), m(s.b, d.b), d.a).to_rgba8888()
        }
    }
}

/// CPU-side renderer
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    target: Vec<u32>,
    front: Vec<u32>,
    textures: HashMap<TextureId, Texture>,
    next_id: u32,
    draw_color: Color,
    draw_blend: BlendMode,
    scale_quality: ScaleQuality,
    stats: RenderStats,
}

impl SoftwareRenderer {
    /// Create a renderer with a `width`×`height` target cleared to black
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = (width * height) as usize;

        Self {
            width,
            height,
            target: vec![Color::BLACK.to_rgba8888(); size],
            front: vec![Color::BLACK.to_rgba8888(); size],
            textures: HashMap::new(),
            next_id: 1,
            draw_color: Color::BLACK,
            draw_blend: BlendMode::None,
            scale_quality: ScaleQuality::Nearest,
            stats: RenderStats::default(),
        }
    }

    /// Last presented frame (RGBA8888 words)
    pub fn frame(&self) -> &[u32] {
        &self.front
    }

    /// Frame being composed (RGBA8888 words)
    pub fn target(&self) -> &[u32] {
        &self.target
    }

    /// Read one pixel of the frame being composed
    pub fn target_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_rgba8888(
            self.target[(y * self.width + x) as usize],
        ))
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    fn plot(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = (y as u32 * self.width + x as u32) as usize;
        self.target[i] = blend_word(self.target[i], self.draw_color.to_rgba8888(), self.draw_blend);
    }
}

impl Renderer for SoftwareRenderer {
    fn create_texture(
        &mut self,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TextureId, RenderError> {
        if width == 0 || height == 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            return Err(RenderError::TextureCreation {
                format,
                width,
                height,
                reason: format!("dimensions must be within 1..={}", MAX_TEXTURE_SIZE),
            });
        }

        let size = (width * height) as usize;
        let data = match format {
            PixelFormat::Rgba8888 => TextureData::Rgba(vec![0; size]),
            PixelFormat::Yv12 => {
                let chroma = (width as usize).div_ceil(2) * (height as usize).div_ceil(2);
                TextureData::Yuv {
                    y: vec![0x10; size],
                    u: vec![0x80; chroma],
                    v: vec![0x80; chroma],
                }
            }
        };

        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(
            id,
            Texture {
                format,
                width,
                height,
                blend: BlendMode::None,
                data,
            },
        );
        self.stats.textures_created += 1;

        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            self.stats.textures_destroyed += 1;
        }
    }

    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&id).map(|t| (t.width, t.height))
    }

    fn set_texture_blend_mode(
        &mut self,
        id: TextureId,
        mode: BlendMode,
    ) -> Result<(), RenderError> {
        let texture = self
            .textures
            .get_mut(&id)
            .ok_or(RenderError::InvalidTexture(id))?;
        texture.blend = mode;
        Ok(())
    }

    fn update_texture(
        &mut self,
        id: TextureId,
        rect: Option<Rect>,
        pixels: &[u32],
        pitch: usize,
    ) -> Result<(), RenderError> {
        let texture = self
            .textures
            .get_mut(&id)
            .ok_or(RenderError::InvalidTexture(id))?;
        let (tw, th) = (texture.width, texture.height);
        let dst_pixels = match &mut texture.data {
            TextureData::Rgba(p) => p,
            TextureData::Yuv { .. } => {
                return Err(RenderError::WrongFormat {
                    id,
                    expected: PixelFormat::Rgba8888,
                    actual: texture.format,
                })
            }
        };

        let Some(region) = rect.unwrap_or(Rect::sized(tw, th)).clip_to(tw, th) else {
            return Ok(());
        };

        let last = (region.y as usize + region.h as usize - 1) * pitch
            + region.x as usize
            + region.w as usize;
        if pixels.len() < last {
            return Err(RenderError::ShortBuffer {
                needed: last,
                actual: pixels.len(),
            });
        }

        for row in region.y as usize..(region.y as usize + region.h as usize) {
            let src = row * pitch + region.x as usize;
            let dst = row * tw as usize + region.x as usize;
            dst_pixels[dst..dst + region.w as usize]
                .copy_from_slice(&pixels[src..src + region.w as usize]);
        }

        self.stats.texture_uploads += 1;
        Ok(())
    }

    fn update_yuv_texture(
        &mut self,
        id: TextureId,
        planes: YuvPlanes<'_>,
    ) -> Result<(), RenderError> {
        let texture = self
            .textures
            .get_mut(&id)
            .ok_or(RenderError::InvalidTexture(id))?;
        let (w, h) = (texture.width as usize, texture.height as usize);
        let (cw, ch) = texture.chroma_size();
        let format = texture.format;

        let TextureData::Yuv { y, u, v } = &mut texture.data else {
            return Err(RenderError::WrongFormat {
                id,
                expected: PixelFormat::Yv12,
                actual: format,
            });
        };

        // Rows that the source does not cover keep their previous contents.
        copy_plane(y, w, h, planes.y, planes.y_pitch);
        copy_plane(u, cw, ch, planes.u, planes.u_pitch);
        copy_plane(v, cw, ch, planes.v, planes.v_pitch);

        self.stats.yuv_uploads += 1;
        Ok(())
    }

    fn copy(
        &mut self,
        id: TextureId,
        src: Option<Rect>,
        dst: Option<Rect>,
    ) -> Result<(), RenderError> {
        let texture = self
            .textures
            .get(&id)
            .ok_or(RenderError::InvalidTexture(id))?;
        let Some(src) = src
            .unwrap_or(Rect::sized(texture.width, texture.height))
            .clip_to(texture.width, texture.height)
        else {
            return Ok(());
        };
        let dst = dst.unwrap_or(Rect::sized(self.width, self.height));
        if dst.is_empty() {
            return Ok(());
        }
        let Some(visible) = dst.clip_to(self.width, self.height) else {
            return Ok(());
        };

        let blend = texture.blend;
        let smooth =
            self.scale_quality == ScaleQuality::Linear && (src.w, src.h) != (dst.w, dst.h);
        let step_x = src.w as f32 / dst.w as f32;
        let step_y = src.h as f32 / dst.h as f32;

        let mut out = std::mem::take(&mut self.target);
        for ty in visible.y..visible.y + visible.h as i32 {
            let sy = src.y as u32 + ((ty - dst.y) as u64 * src.h as u64 / dst.h as u64) as u32;
            let fy = ((ty - dst.y) as f32 + 0.5) * step_y - 0.5;
            let row = (ty as u32 * self.width) as usize;
            for tx in visible.x..visible.x + visible.w as i32 {
                let word = if smooth {
                    let fx = ((tx - dst.x) as f32 + 0.5) * step_x - 0.5;
                    texture.sample_linear(src, fx, fy)
                } else {
                    let sx =
                        src.x as u32 + ((tx - dst.x) as u64 * src.w as u64 / dst.w as u64) as u32;
                    texture.sample(sx, sy)
                };
                let i = row + tx as usize;
                out[i] = blend_word(out[i], word, blend);
            }
        }
        self.target = out;

        self.stats.copies += 1;
        Ok(())
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn set_draw_blend_mode(&mut self, mode: BlendMode) {
        self.draw_blend = mode;
    }

    fn draw_blend_mode(&self) -> BlendMode {
        self.draw_blend
    }

    fn clear(&mut self) {
        self.target.fill(self.draw_color.to_rgba8888());
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        // Bresenham
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.plot(x, y);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect) {
        let Some(r) = rect.clip_to(self.width, self.height) else {
            return;
        };
        for y in r.y..r.y + r.h as i32 {
            for x in r.x..r.x + r.w as i32 {
                self.plot(x, y);
            }
        }
    }

    fn set_logical_size(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        let size = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.target = vec![Color::BLACK.to_rgba8888(); size];
        self.front = vec![Color::BLACK.to_rgba8888(); size];
    }

    fn output_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_scale_quality(&mut self, quality: ScaleQuality) {
        self.scale_quality = quality;
    }

    fn scale_quality(&self) -> ScaleQuality {
        self.scale_quality
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.front.copy_from_slice(&self.target);
        self.stats.presents += 1;
        Ok(())
    }

    fn read_pixels(&self) -> Result<Capture, RenderError> {
        Ok(Capture {
            width: self.width,
            height: self.height,
            pixels: self.front.clone(),
        })
    }

    fn stats(&self) -> RenderStats {
        self.stats
    }
}

/// Copy `rows` rows of `width` bytes from a pitched source plane
fn copy_plane(dst: &mut [u8], width: usize, rows: usize, src: &[u8], pitch: usize) {
    let pitch = pitch.max(1);
    for row in 0..rows {
        let start = row * pitch;
        if start >= src.len() {
            break;
        }
        let n = width.min(src.len() - start);
        dst[row * width..row * width + n].copy_from_slice(&src[start..start + n]);
    }
}
