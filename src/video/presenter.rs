// Frame presenter - Composes and presents one frame
//
// Order per frame:
// 1. Clear the target
// 2. Upload the YUV planes if the decode thread left new data
// 3. Upload the dirty LED region, then the dirty overlay region
// 4. Copy the YUV texture, then the overlay texture (LED region only)
// 5. Subtitle, vendor text, scanlines
// 6. Present (primary, then scoreboard), then a queued screenshot

use super::context::DisplayContext;
use super::font::FontKind;
use super::led::LED_RECT;
use super::scanlines;
use super::subtitle::SubtitleState;
use crate::error::VideoError;
use crate::render::{Color, Rect, Renderer, TextureId};
use std::path::PathBuf;

/// Vertical scale from protocol row Y to draw Y, per draw pixel
const VENDOR_ROW_Y_SCALE: f64 = 0.004;

/// Where the presenter is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentPhase {
    #[default]
    Idle,
    YuvCheck,
    LedCheck,
    OverlayCheck,
    Compose,
    Present,
    /// Display shut down; no more frames
    Shutdown,
}

/// What happened during one presented frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub yuv_uploaded: bool,
    pub led_uploaded: bool,
    pub overlay_uploaded: bool,
    pub subtitle_drawn: bool,
    /// Path of the screenshot written after this frame
    pub screenshot: Option<PathBuf>,
}

fn upload(renderer: &mut dyn Renderer, id: TextureId, what: &str, region: (Rect, &[u32], usize)) {
    let (rect, pixels, pitch) = region;
    if let Err(e) = renderer.update_texture(id, Some(rect), pixels, pitch) {
        log::warn!("{} texture update failed: {}", what, e);
    }
}

impl DisplayContext {
    /// Compose and present one frame
    ///
    /// Steady-state failures (uploads, copies, present) are logged and the
    /// frame goes on.
    ///
    /// # Errors
    /// A texture could not be created, or a queued screenshot could not
    /// read the frame back.
    pub fn present_frame(&mut self) -> Result<FrameReport, VideoError> {
        let Some(renderer) = self.renderer.as_deref_mut() else {
            return Err(VideoError::NotOpen);
        };
        let mut report = FrameReport::default();

        renderer.set_draw_color(Color::BLACK);
        renderer.clear();

        self.phase = PresentPhase::YuvCheck;
        report.yuv_uploaded = self.textures.consume_yuv_if_dirty(renderer, &self.yuv)?;

        self.phase = PresentPhase::LedCheck;
        // Glyph text is re-uploaded every frame, so it needs the texture too
        if self.glyph_text_active || self.leds.needs_update() || self.overlay.needs_update() {
            let (w, h) = self.led_overlay_size();
            let renderer = self.renderer.as_deref_mut().ok_or(VideoError::NotOpen)?;
            let id = self.textures.ensure_overlay(renderer, w, h)?;

            if let Some(region) = self.leds.take_update() {
                upload(renderer, id, "LED", region);
                report.led_uploaded = true;
            }

            self.phase = PresentPhase::OverlayCheck;
            if let Some(region) = self.overlay.take_update() {
                upload(renderer, id, "Overlay", region);
                report.overlay_uploaded = true;
            }
        }

        self.phase = PresentPhase::Compose;
        let renderer = self.renderer.as_deref_mut().ok_or(VideoError::NotOpen)?;
        if let Some(id) = self.textures.yuv_texture() {
            if let Err(e) = renderer.copy(id, None, None) {
                log::warn!("YUV copy failed: {}", e);
            }
        }
        if let Some(id) = self.textures.overlay_texture() {
            if let Err(e) = renderer.copy(id, Some(LED_RECT), None) {
                log::warn!("Overlay copy failed: {}", e);
            }
        }

        let (dw, dh) = self.geometry.draw_size();
        if let Some(text) = self.subtitle.tick() {
            let (x, y) = SubtitleState::position(dw, dh);
            self.fonts.draw_text(renderer, FontKind::Subtitle, x, y, text);
            report.subtitle_drawn = true;
        }

        if self.glyph_text_active {
            if let Some(id) = self.textures.overlay_texture() {
                upload(renderer, id, "Vendor glyph", self.leds.region());
            }
        } else if self.vendor.enabled() {
            for (row_y, row) in self.vendor.visible_rows() {
                let y = (row_y as f64 * dh as f64 * VENDOR_ROW_Y_SCALE) as i32;
                self.fonts
                    .draw_text(renderer, FontKind::Fixed, row.x as i32, y, &row.text);
            }
        }

        if self.options.scanlines {
            scanlines::draw_scanlines(renderer, dw, dh);
        }

        self.phase = PresentPhase::Present;
        if let Err(e) = renderer.present() {
            log::warn!("Present failed: {}", e);
        }
        if let Some(scoreboard) = self.scoreboard.as_mut() {
            scoreboard.present();
        }

        if self.screenshot_queued {
            self.screenshot_queued = false;
            report.screenshot = self.take_screenshot()?;
        }

        self.phase = PresentPhase::Idle;
        Ok(report)
    }
}
