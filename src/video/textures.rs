// Texture store - Renderer textures owned by the presentation thread
//
// Other components only mark their buffers dirty; textures are created,
// refreshed and destroyed here, always on the thread that owns the
// renderer.

use super::yuv::YuvFrameBuffer;
use crate::error::VideoError;
use crate::render::{BlendMode, PixelFormat, Renderer, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YuvTexture {
    id: TextureId,
    generation: u64,
}

/// Texture handles of the primary renderer
#[derive(Debug, Default)]
pub struct TextureStore {
    yuv: Option<YuvTexture>,
    overlay: Option<TextureId>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current YUV texture
    pub fn yuv_texture(&self) -> Option<TextureId> {
        self.yuv.map(|t| t.id)
    }

    /// Current overlay texture
    pub fn overlay_texture(&self) -> Option<TextureId> {
        self.overlay
    }

    /// Bring the YUV texture up to date with the shared buffer
    ///
    /// A texture belonging to an older allocation (or to a released buffer)
    /// is destroyed first. When new data is waiting the texture is created
    /// if absent, sized to the buffer, and all three planes are uploaded.
    ///
    /// # Returns
    /// Whether planes were uploaded. Creation failure is fatal; a failed
    /// upload is logged and the frame goes on.
    pub fn consume_yuv_if_dirty(
        &mut self,
        renderer: &mut dyn Renderer,
        buffer: &YuvFrameBuffer,
    ) -> Result<bool, VideoError> {
        let current = buffer.generation();
        self.drop_stale_yuv(renderer, current);

        buffer.consume_if_dirty(|frame| {
            // setup() may have run since the generation check
            self.drop_stale_yuv(renderer, Some(frame.generation()));

            let id = match self.yuv {
                Some(texture) => texture.id,
                None => {
                    let id = renderer
                        .create_texture(PixelFormat::Yv12, frame.width(), frame.height())
                        .map_err(VideoError::texture("YUV"))?;
                    log::debug!("Created {}x{} YUV texture", frame.width(), frame.height());
                    self.yuv = Some(YuvTexture {
                        id,
                        generation: frame.generation(),
                    });
                    id
                }
            };

            if let Err(e) = renderer.update_yuv_texture(id, frame.planes()) {
                log::warn!("YUV texture update failed: {}", e);
            }
            Ok(())
        })
    }

    fn drop_stale_yuv(&mut self, renderer: &mut dyn Renderer, current: Option<u64>) {
        if let Some(texture) = self.yuv {
            if Some(texture.generation) != current {
                renderer.destroy_texture(texture.id);
                self.yuv = None;
                log::debug!("Destroyed YUV texture of generation {}", texture.generation);
            }
        }
    }

    /// Return the overlay texture, creating it with alpha blending if absent
    pub fn ensure_overlay(
        &mut self,
        renderer: &mut dyn Renderer,
        width: u32,
        height: u32,
    ) -> Result<TextureId, VideoError> {
        if let Some(id) = self.overlay {
            return Ok(id);
        }

        let id = renderer
            .create_texture(PixelFormat::Rgba8888, width, height)
            .map_err(VideoError::texture("overlay"))?;
        renderer
            .set_texture_blend_mode(id, BlendMode::Blend)
            .map_err(VideoError::texture("overlay"))?;

        log::debug!("Created {}x{} overlay texture", width, height);
        self.overlay = Some(id);
        Ok(id)
    }

    /// Destroy every texture
    pub fn destroy_all(&mut self, renderer: &mut dyn Renderer) {
        if let Some(texture) = self.yuv.take() {
            renderer.destroy_texture(texture.id);
        }
        if let Some(id) = self.overlay.take() {
            renderer.destroy_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareRenderer;

    fn filled_buffer(w: u32, h: u32) -> YuvFrameBuffer {
        let buffer = YuvFrameBuffer::new();
        buffer.setup(w, h).unwrap();
        let size = (w * h) as usize;
        buffer
            .update(&vec![0x10; size], &vec![0x80; size / 4], &vec![0x80; size / 4], w as usize, w as usize / 2, w as usize / 2)
            .unwrap();
        buffer
    }

    #[test]
    fn test_yuv_texture_created_lazily() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        let mut store = TextureStore::new();
        let buffer = YuvFrameBuffer::new();
        buffer.setup(8, 8).unwrap();

        assert!(!store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap());
        assert_eq!(store.yuv_texture(), None);

        let buffer = filled_buffer(8, 8);
        assert!(store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap());
        let id = store.yuv_texture().unwrap();
        assert_eq!(renderer.texture_size(id), Some((8, 8)));
    }

    #[test]
    fn test_resolution_change_recreates_texture() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        let mut store = TextureStore::new();
        let buffer = filled_buffer(8, 8);
        store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap();
        let old = store.yuv_texture().unwrap();

        buffer.setup(4, 4).unwrap();
        store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap();
        assert_eq!(store.yuv_texture(), None);
        assert_eq!(renderer.texture_size(old), None);

        buffer
            .update(&[0x10; 16], &[0x80; 4], &[0x80; 4], 4, 2, 2)
            .unwrap();
        store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap();
        let new = store.yuv_texture().unwrap();
        assert_eq!(renderer.texture_size(new), Some((4, 4)));
    }

    #[test]
    fn test_released_buffer_destroys_texture() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        let mut store = TextureStore::new();
        let buffer = filled_buffer(8, 8);
        store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap();

        buffer.release();
        store.consume_yuv_if_dirty(&mut renderer, &buffer).unwrap();
        assert_eq!(store.yuv_texture(), None);
        assert_eq!(renderer.texture_count(), 0);
    }

    #[test]
    fn test_overlay_created_once() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        let mut store = TextureStore::new();
        let a = store.ensure_overlay(&mut renderer, 320, 240).unwrap();
        let b = store.ensure_overlay(&mut renderer, 320, 240).unwrap();
        assert_eq!(a, b);
        assert_eq!(renderer.texture_count(), 1);
    }

    #[test]
    fn test_overlay_creation_failure_is_error() {
        let mut renderer = SoftwareRenderer::new(16, 16);
        let mut store = TextureStore::new();
        assert!(matches!(
            store.ensure_overlay(&mut renderer, 0, 0),
            Err(VideoError::Texture { what: "overlay", .. })
        ));
    }
}
