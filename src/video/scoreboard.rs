// Scoreboard window - Secondary window for games with a software scoreboard
//
// The window has its own renderer. Bitmaps (LED digits, player/lives/credit
// labels) are copied straight onto its target and shown when the primary
// frame is presented.

use super::surface::Surface;
use crate::display::{OutputWindow, WindowRequest, WindowSystem};
use crate::error::VideoError;
use crate::render::{PixelFormat, Rect, Renderer, TextureId};

/// Scoreboard window width
pub const SCOREBOARD_WIDTH: u32 = 340;
/// Scoreboard window height
pub const SCOREBOARD_HEIGHT: u32 = 480;
/// Scoreboard window position
pub const SCOREBOARD_POSITION: (i32, i32) = (4, 28);

/// Size of the scoreboard's target texture
pub const SCOREBOARD_TEXTURE_SIZE: (u32, u32) = (320, 240);

/// Open scoreboard window with its renderer
pub struct ScoreboardDisplay {
    window: Box<dyn OutputWindow>,
    renderer: Box<dyn Renderer>,
    texture: TextureId,
}

impl ScoreboardDisplay {
    /// Open the scoreboard window
    ///
    /// # Errors
    /// Window, renderer or texture failure; the caller treats it as fatal.
    pub fn open(system: &mut dyn WindowSystem) -> Result<Self, VideoError> {
        let mut request = WindowRequest::new("", SCOREBOARD_WIDTH, SCOREBOARD_HEIGHT);
        request.position = Some(SCOREBOARD_POSITION);
        request.always_on_top = true;

        let mut window = system.open_window(&request)?;
        let mut renderer = window.create_renderer(SCOREBOARD_WIDTH, SCOREBOARD_HEIGHT)?;
        let (tw, th) = SCOREBOARD_TEXTURE_SIZE;
        let texture = renderer
            .create_texture(PixelFormat::Rgba8888, tw, th)
            .map_err(VideoError::texture("scoreboard"))?;

        log::debug!("Opened {}x{} scoreboard window", SCOREBOARD_WIDTH, SCOREBOARD_HEIGHT);
        Ok(Self {
            window,
            renderer,
            texture,
        })
    }

    /// Copy a bitmap to `(x, y)` on the scoreboard
    ///
    /// # Returns
    /// Whether the bitmap reached the target
    pub fn draw_bitmap(&mut self, bitmap: &Surface, x: i32, y: i32) -> bool {
        let (w, h) = (bitmap.width(), bitmap.height());
        let id = match self.renderer.create_texture(PixelFormat::Rgba8888, w, h) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Scoreboard texture failed: {}", e);
                return false;
            }
        };

        let drawn = self
            .renderer
            .update_texture(id, None, bitmap.pixels(), bitmap.pitch())
            .and_then(|_| self.renderer.copy(id, None, Some(Rect::new(x, y, w, h))));
        self.renderer.destroy_texture(id);

        match drawn {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Scoreboard draw failed: {}", e);
                false
            }
        }
    }

    /// Show what has been drawn
    pub fn present(&mut self) {
        if let Err(e) = self.renderer.present() {
            log::warn!("Scoreboard present failed: {}", e);
        }
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Release the texture and hide the window
    pub fn close(mut self) {
        self.renderer.destroy_texture(self.texture);
        self.window.hide();
    }
}
