// Display context - The single owner of all compositor state
//
// Game logic, the input layer and the presenter all go through one
// `DisplayContext` living on the presentation thread. The only state shared
// with another thread is the YUV frame buffer, handed out as a clone.

use super::assets::{Assets, OtherGfx};
use super::font::{BitmapFont, FontKind, FontService, FontSizes};
use super::led::LedOverlayBuffer;
use super::overlay::OverlayBuffer;
use super::palette::IndexedSurface;
use super::presenter::PresentPhase;
use super::scoreboard::ScoreboardDisplay;
use super::screenshot::{self, ScreenshotError};
use super::subtitle::SubtitleState;
use super::textures::TextureStore;
use super::vendor_text::{LineOutcome, VendorTextTable};
use super::yuv::{YuvError, YuvFrameBuffer};
use crate::display::{
    DisplayGeometry, DisplayOptions, FullscreenMode, OutputWindow, VendorTextStyle,
    WindowRequest, WindowSystem,
};
use crate::error::VideoError;
use crate::render::{BlendMode, Color, Renderer, ScaleQuality};
use std::path::PathBuf;

/// Window title
pub const WINDOW_TITLE: &str = "HYPSEUS Singe: Multiple Arcade Laserdisc Emulator";

/// Window title used for narrow windows
pub const SHORT_WINDOW_TITLE: &str = "HYPSEUS Singe";

/// Narrowest draw width that still gets the full title
const FULL_TITLE_MIN_WIDTH: u32 = 500;

/// Color of text placed with `draw_string`
pub const STRING_COLOR: Color = Color::rgba(225, 225, 225, 0xFF);

/// Overlay texture size when the game has no overlay of its own
const LED_ONLY_OVERLAY: (u32, u32) = (320, 240);

/// Compositor state
///
/// Created closed; `open` acquires the window, renderer and textures.
pub struct DisplayContext {
    pub(super) options: DisplayOptions,
    pub(super) geometry: DisplayGeometry,

    pub(super) window: Option<Box<dyn OutputWindow>>,
    pub(super) renderer: Option<Box<dyn Renderer>>,
    pub(super) textures: TextureStore,
    pub(super) scoreboard: Option<ScoreboardDisplay>,

    pub(super) yuv: YuvFrameBuffer,
    pub(super) overlay: OverlayBuffer,
    pub(super) leds: LedOverlayBuffer,
    pub(super) vendor: VendorTextTable,
    pub(super) glyph_text_active: bool,
    pub(super) subtitle: SubtitleState,

    pub(super) fonts: Box<dyn FontService>,
    custom_fonts: bool,
    font_sizes: FontSizes,
    assets: Assets,

    pub(super) screenshot_queued: bool,
    pub(super) phase: PresentPhase,
}

impl DisplayContext {
    /// Create a closed context
    ///
    /// # Arguments
    /// * `options` - Display options
    /// * `overlay_width`, `overlay_height` - The game's overlay size; zero
    ///   when the game draws no overlay
    pub fn new(options: DisplayOptions, overlay_width: u32, overlay_height: u32) -> Self {
        let geometry = options.geometry();
        let font_sizes = FontSizes::for_display(
            geometry.draw_width,
            options.aspect,
            options.vendor_style == VendorTextStyle::Glyphs,
        );

        Self {
            options,
            geometry,
            window: None,
            renderer: None,
            textures: TextureStore::new(),
            scoreboard: None,
            yuv: YuvFrameBuffer::new(),
            overlay: OverlayBuffer::new(overlay_width, overlay_height),
            leds: LedOverlayBuffer::new(),
            vendor: VendorTextTable::new(),
            glyph_text_active: false,
            subtitle: SubtitleState::new(),
            fonts: Box::new(BitmapFont::new(font_sizes)),
            custom_fonts: false,
            font_sizes,
            assets: Assets::empty(),
            screenshot_queued: false,
            phase: PresentPhase::Idle,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open the display
    ///
    /// Opens the output window sized to the draw dimensions, attaches a
    /// renderer, opens the scoreboard window when configured, creates the
    /// overlay texture and presents one black frame. An already open
    /// display is shut down first.
    ///
    /// # Errors
    /// Any window, renderer or texture failure. Everything acquired so far
    /// is released before returning.
    pub fn open(&mut self, system: &mut dyn WindowSystem) -> Result<(), VideoError> {
        if self.is_open() {
            self.shutdown();
        }

        self.geometry = self.options.geometry();
        let (w, h) = self.geometry.draw_size();

        let title = if w < FULL_TITLE_MIN_WIDTH {
            SHORT_WINDOW_TITLE
        } else {
            WINDOW_TITLE
        };
        let mut request = WindowRequest::new(title, w, h);
        request.mode = self.geometry.mode;

        let mut window = system.open_window(&request)?;
        let mut renderer = window.create_renderer(w, h)?;

        let flags = window.flags();
        if flags.fullscreen || flags.maximized {
            if !self.options.scale_nearest {
                renderer.set_scale_quality(ScaleQuality::Linear);
            }
            renderer.set_logical_size(w, h);
        }

        let scoreboard = if self.options.software_scoreboard && !self.options.fullscreen {
            Some(ScoreboardDisplay::open(system)?)
        } else {
            None
        };

        window.set_cursor_visible(false);

        if self.options.scanlines {
            renderer.set_draw_blend_mode(BlendMode::Mod);
        }

        self.font_sizes = FontSizes::for_display(
            w,
            self.options.aspect,
            self.options.vendor_style == VendorTextStyle::Glyphs,
        );
        if !self.custom_fonts {
            self.fonts = Box::new(BitmapFont::new(self.font_sizes));
        }

        let mut textures = TextureStore::new();
        if self.overlay.has_area() {
            if let Err(e) =
                textures.ensure_overlay(renderer.as_mut(), self.overlay.width(), self.overlay.height())
            {
                if let Some(scoreboard) = scoreboard {
                    scoreboard.close();
                }
                return Err(e);
            }
        }

        renderer.set_draw_color(Color::BLACK);
        renderer.clear();
        if let Err(e) = renderer.present() {
            log::warn!("Initial present failed: {}", e);
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.textures = textures;
        self.scoreboard = scoreboard;
        self.phase = PresentPhase::Idle;

        // The old YUV texture died with the old renderer
        self.yuv.mark_dirty();

        log::info!(
            "Display open at {}x{} ({:?}, scale {}%)",
            w,
            h,
            self.geometry.mode,
            self.geometry.scale.percent()
        );
        Ok(())
    }

    /// Reopen the display with the current options
    pub fn reconfigure(&mut self, system: &mut dyn WindowSystem) -> Result<(), VideoError> {
        log::debug!("Reconfiguring display");
        self.shutdown();
        self.open(system)
    }

    /// Release every window, renderer and texture
    pub fn shutdown(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            self.textures.destroy_all(renderer.as_mut());
        }
        if let Some(scoreboard) = self.scoreboard.take() {
            scoreboard.close();
        }
        self.renderer = None;
        if let Some(mut window) = self.window.take() {
            window.hide();
            log::debug!("Display shut down");
        }
        self.phase = PresentPhase::Shutdown;
    }

    pub fn is_open(&self) -> bool {
        self.renderer.is_some()
    }

    /// Flip desktop fullscreen on the live window
    ///
    /// On failure a warning is logged and the previous mode is kept.
    pub fn toggle_fullscreen(&mut self) {
        let (Some(window), Some(renderer)) = (self.window.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        let entering = !window.flags().fullscreen;
        if let Err(e) = window.set_fullscreen(entering) {
            log::warn!("Toggle fullscreen failed: {}", e);
            return;
        }

        self.options.fullscreen = entering;
        self.geometry.mode = FullscreenMode::from_flags(entering, self.options.fake_fullscreen);

        let (w, h) = self.geometry.draw_size();
        if entering {
            renderer.set_logical_size(w, h);
        } else {
            window.set_size(w, h);
            window.center();
        }
    }

    /// Switch scanlines on or off
    pub fn toggle_scanlines(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            if renderer.draw_blend_mode() != BlendMode::Mod {
                renderer.set_draw_blend_mode(BlendMode::Mod);
            }
        }
        self.options.scanlines = !self.options.scanlines;
    }

    /// The output window changed size
    pub fn window_resized(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.window_resized(width, height);
        }
    }

    /// Ask the window system for the next frame
    pub fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    /// Clear the render target to black
    pub fn blank(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_draw_color(Color::BLACK);
            renderer.clear();
        }
    }

    // ------------------------------------------------------------------
    // Game-side drawing
    // ------------------------------------------------------------------

    /// Convert the game's overlay into the RGBA overlay buffer
    ///
    /// Skipped while an LED or vendor glyph update owns the overlay texture.
    ///
    /// # Returns
    /// Whether the overlay was taken
    pub fn update_overlay(&mut self, surface: &IndexedSurface, x: i32, y: i32) -> bool {
        if self.leds.needs_update() || self.glyph_text_active {
            return false;
        }
        self.overlay.convert(surface, x, y);
        true
    }

    /// Draw LED digits into the LED buffer
    ///
    /// # Arguments
    /// * `values` - Digit values (index into the LED glyph strip)
    /// * `start_x`, `y` - Position of the first digit
    ///
    /// # Returns
    /// `false` when no LED glyph strip is loaded
    pub fn draw_led_digits(&mut self, values: &[u32], start_x: i32, y: i32) -> bool {
        let Some(strip) = self.assets.led_strip() else {
            log::debug!("No LED glyph strip loaded");
            return false;
        };
        self.leds.draw_digits(strip, values, start_x, y);
        true
    }

    /// Handle one vendor text line from the game
    ///
    /// With the font style the line goes into the row table; with the glyph
    /// style it is blitted into the LED buffer right away.
    ///
    /// # Returns
    /// What the line did to the row table; `None` for glyph-style lines
    pub fn draw_vendor_text_line(
        &mut self,
        text: &[u8],
        start_x: i32,
        y: i32,
    ) -> Option<LineOutcome> {
        match self.options.vendor_style {
            VendorTextStyle::Font => {
                let base = self.options.aspect.horizontal_units();
                let x = (self.geometry.draw_width as f64 / base * start_x as f64) as f32;
                Some(self.vendor.draw_line(text, x, y))
            }
            VendorTextStyle::Glyphs => {
                self.glyph_text_active = true;
                match self.assets.vendor_charmap() {
                    Some(charmap) => {
                        self.leds
                            .draw_glyph_line(charmap, text, start_x, y, self.options.aspect)
                    }
                    None => log::debug!("No vendor character map loaded"),
                }
                None
            }
        }
    }

    /// Place a text string in the LED buffer
    ///
    /// # Arguments
    /// * `text` - Text to draw
    /// * `col` - Column; 6 pixels per column in glyph style, 5 otherwise
    /// * `row` - Y position in pixels
    pub fn draw_string(&mut self, text: &str, col: i32, row: i32) {
        let x = match self.options.vendor_style {
            VendorTextStyle::Glyphs => col * 6,
            VendorTextStyle::Font => col * 5,
        };
        let rendered = self.fonts.render_text(FontKind::Text, text, STRING_COLOR);
        self.leds.draw_text(&rendered, text.chars().count(), x, row);
    }

    /// Show a subtitle
    pub fn draw_subtitle(&mut self, text: &str) {
        self.subtitle.insert(text);
    }

    /// Copy LED bitmap `value` to the scoreboard window
    pub fn draw_led(&mut self, value: usize, x: i32, y: i32) -> bool {
        match (self.scoreboard.as_mut(), self.assets.led(value)) {
            (Some(scoreboard), Some(bitmap)) => scoreboard.draw_bitmap(bitmap, x, y),
            _ => false,
        }
    }

    /// Copy a scoreboard graphic to the scoreboard window
    pub fn draw_othergfx(&mut self, which: OtherGfx, x: i32, y: i32) -> bool {
        match (self.scoreboard.as_mut(), self.assets.other(which)) {
            (Some(scoreboard), Some(bitmap)) => scoreboard.draw_bitmap(bitmap, x, y),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Screenshots
    // ------------------------------------------------------------------

    /// Take a screenshot after the next presented frame
    pub fn queue_screenshot(&mut self) {
        self.screenshot_queued = true;
    }

    pub fn screenshot_queued(&self) -> bool {
        self.screenshot_queued
    }

    /// Save the last presented frame
    ///
    /// Refusals (missing directory, fullscreen or maximised window) and
    /// write failures are logged and yield `Ok(None)`.
    ///
    /// # Errors
    /// The frame could not be read back.
    pub fn take_screenshot(&mut self) -> Result<Option<PathBuf>, VideoError> {
        let dir = self.options.screenshot_dir.clone();
        if let Err(e) = screenshot::check_directory(&dir) {
            log::warn!("{}", e);
            return Ok(None);
        }

        let (Some(window), Some(renderer)) = (self.window.as_ref(), self.renderer.as_ref()) else {
            log::error!("No renderer to take a screenshot from");
            return Ok(None);
        };

        let flags = window.flags();
        if flags.fullscreen || flags.maximized {
            log::warn!("{}", ScreenshotError::Fullscreen);
            return Ok(None);
        }

        let capture = renderer.read_pixels().map_err(VideoError::Readback)?;
        match screenshot::save_screenshot(&capture, &dir) {
            Ok(path) => {
                log::info!("Wrote screenshot: {}", path.display());
                Ok(Some(path))
            }
            Err(e) => {
                log::error!("Could not write screenshot: {}", e);
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------
    // YUV
    // ------------------------------------------------------------------

    /// Handle for the decode thread
    pub fn yuv_buffer(&self) -> YuvFrameBuffer {
        self.yuv.clone()
    }

    /// Allocate the YUV buffer for a new video resolution
    pub fn setup_yuv(&self, width: u32, height: u32) -> Result<(), YuvError> {
        self.yuv.setup(width, height)
    }

    /// Store a decoded frame
    pub fn update_yuv(
        &self,
        y: &[u8],
        u: &[u8],
        v: &[u8],
        y_pitch: usize,
        u_pitch: usize,
        v_pitch: usize,
    ) -> Result<(), YuvError> {
        self.yuv.update(y, u, v, y_pitch, u_pitch, v_pitch)
    }

    /// Make the next decoded frame black
    pub fn request_blank(&self) {
        self.yuv.request_blank();
    }

    /// YUV buffer width; 0 before setup
    pub fn yuv_width(&self) -> u32 {
        self.yuv.dimensions().map_or(0, |(w, _)| w)
    }

    /// YUV buffer height; 0 before setup
    pub fn yuv_height(&self) -> u32 {
        self.yuv.dimensions().map_or(0, |(_, h)| h)
    }

    /// Whether both the YUV buffer and its texture exist
    pub fn yuv_ready(&self) -> bool {
        self.yuv.dimensions().is_some() && self.textures.yuv_texture().is_some()
    }

    // ------------------------------------------------------------------
    // Options and accessors
    // ------------------------------------------------------------------

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Mutable options; geometry changes apply on the next `open`
    pub fn options_mut(&mut self) -> &mut DisplayOptions {
        &mut self.options
    }

    /// Set the overlay aspect from the game's code
    pub fn set_aspect_code(&mut self, code: i32) {
        self.options.set_aspect_code(code);
        self.font_sizes = FontSizes::for_display(
            self.geometry.draw_width,
            self.options.aspect,
            self.options.vendor_style == VendorTextStyle::Glyphs,
        );
        if !self.custom_fonts {
            self.fonts = Box::new(BitmapFont::new(self.font_sizes));
        }
    }

    /// Replace the bitmap assets
    pub fn set_assets(&mut self, assets: Assets) {
        self.assets = assets;
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Use an external font service instead of the built-in bitmap font
    pub fn set_font_service(&mut self, fonts: Box<dyn FontService>) {
        self.fonts = fonts;
        self.custom_fonts = true;
    }

    pub fn font_sizes(&self) -> FontSizes {
        self.font_sizes
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    pub fn draw_width(&self) -> u32 {
        self.geometry.draw_width
    }

    pub fn draw_height(&self) -> u32 {
        self.geometry.draw_height
    }

    pub fn overlay_width(&self) -> u32 {
        self.overlay.width()
    }

    pub fn overlay_height(&self) -> u32 {
        self.overlay.height()
    }

    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    pub fn window(&self) -> Option<&dyn OutputWindow> {
        self.window.as_deref()
    }

    pub fn scoreboard(&self) -> Option<&ScoreboardDisplay> {
        self.scoreboard.as_ref()
    }

    pub fn subtitle(&self) -> &SubtitleState {
        &self.subtitle
    }

    pub fn vendor_text(&self) -> &VendorTextTable {
        &self.vendor
    }

    pub fn leds(&self) -> &LedOverlayBuffer {
        &self.leds
    }

    pub fn phase(&self) -> PresentPhase {
        self.phase
    }

    /// Overlay texture size to use when LEDs need one
    pub(super) fn led_overlay_size(&self) -> (u32, u32) {
        if self.overlay.has_area() {
            (self.overlay.width(), self.overlay.height())
        } else {
            LED_ONLY_OVERLAY
        }
    }
}

impl Drop for DisplayContext {
    fn drop(&mut self) {
        if self.is_open() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessWindowSystem;
    use crate::video::surface::Surface;

    fn strip() -> Surface {
        let mut strip = Surface::new(8 * 17, 13);
        strip.fill(Color::WHITE);
        strip
    }

    fn open_context(options: DisplayOptions) -> (DisplayContext, HeadlessWindowSystem) {
        let mut system = HeadlessWindowSystem::new();
        let mut context = DisplayContext::new(options, 320, 240);
        context.open(&mut system).unwrap();
        (context, system)
    }

    #[test]
    fn test_open_uses_draw_size_and_title() {
        let (context, system) = open_context(DisplayOptions::new());
        let request = &system.requests()[0];
        assert_eq!((request.width, request.height), (640, 480));
        assert_eq!(request.title, WINDOW_TITLE);
        assert_eq!(context.renderer().unwrap().output_size(), (640, 480));
        assert_eq!(context.renderer().unwrap().stats().presents, 1);
    }

    #[test]
    fn test_narrow_window_gets_short_title() {
        let mut options = DisplayOptions::new();
        options.set_scale_factor(50);
        let (_context, system) = open_context(options);
        assert_eq!(system.requests()[0].title, SHORT_WINDOW_TITLE);
    }

    #[test]
    fn test_open_failure_tears_down() {
        let mut system = HeadlessWindowSystem::new().without_renderers();
        let mut context = DisplayContext::new(DisplayOptions::new(), 0, 0);
        assert!(matches!(
            context.open(&mut system),
            Err(VideoError::Display(_))
        ));
        assert!(!context.is_open());
        assert!(context.window().is_none());
    }

    #[test]
    fn test_fullscreen_open_requests_linear_scaling() {
        let mut options = DisplayOptions::new();
        options.fullscreen = true;
        let (context, _) = open_context(options.clone());
        assert_eq!(
            context.renderer().unwrap().scale_quality(),
            ScaleQuality::Linear
        );

        options.scale_nearest = true;
        let (context, _) = open_context(options);
        assert_eq!(
            context.renderer().unwrap().scale_quality(),
            ScaleQuality::Nearest
        );
    }

    #[test]
    fn test_windowed_open_keeps_nearest_scaling() {
        let (context, _) = open_context(DisplayOptions::new());
        assert_eq!(
            context.renderer().unwrap().scale_quality(),
            ScaleQuality::Nearest
        );
    }

    #[test]
    fn test_scoreboard_only_when_windowed() {
        let mut options = DisplayOptions::new();
        options.software_scoreboard = true;
        let (context, system) = open_context(options.clone());
        assert!(context.scoreboard().is_some());
        assert_eq!(system.requests().len(), 2);

        options.fullscreen = true;
        let (context, _) = open_context(options);
        assert!(context.scoreboard().is_none());
    }

    #[test]
    fn test_scanlines_enable_mod_blend() {
        let mut options = DisplayOptions::new();
        options.scanlines = true;
        let (context, _) = open_context(options);
        assert_eq!(context.renderer().unwrap().draw_blend_mode(), BlendMode::Mod);
    }

    #[test]
    fn test_toggle_scanlines() {
        let (mut context, _) = open_context(DisplayOptions::new());
        context.toggle_scanlines();
        assert!(context.options().scanlines);
        assert_eq!(context.renderer().unwrap().draw_blend_mode(), BlendMode::Mod);
        context.toggle_scanlines();
        assert!(!context.options().scanlines);
    }

    #[test]
    fn test_toggle_fullscreen_failure_keeps_mode() {
        let mut system = HeadlessWindowSystem::new().without_fullscreen();
        let mut context = DisplayContext::new(DisplayOptions::new(), 0, 0);
        context.open(&mut system).unwrap();

        context.toggle_fullscreen();
        assert!(!context.options().fullscreen);
        assert!(!context.window().unwrap().flags().fullscreen);
    }

    #[test]
    fn test_toggle_fullscreen_round_trip() {
        let (mut context, _) = open_context(DisplayOptions::new());
        context.toggle_fullscreen();
        assert!(context.window().unwrap().flags().fullscreen);
        context.toggle_fullscreen();
        assert!(!context.window().unwrap().flags().fullscreen);
        assert!(!context.options().fullscreen);
    }

    #[test]
    fn test_overlay_skipped_while_leds_dirty() {
        let (mut context, _) = open_context(DisplayOptions::new());
        let mut assets = Assets::empty();
        assets.set_led_strip(strip());
        context.set_assets(assets);

        assert!(context.draw_led_digits(&[1, 2], 0, 0));
        let source = IndexedSurface::new(4, 4, Default::default());
        assert!(!context.update_overlay(&source, 0, 0));
    }

    #[test]
    fn test_led_digits_need_strip() {
        let (mut context, _) = open_context(DisplayOptions::new());
        assert!(!context.draw_led_digits(&[1], 0, 0));
        assert!(!context.leds().needs_update());
    }

    #[test]
    fn test_vendor_font_x_scaling() {
        let mut options = DisplayOptions::new();
        options.set_aspect_code(0x96);
        let (mut context, _) = open_context(options);

        let outcome = context.draw_vendor_text_line(b"PLAYER", 160, 69);
        assert_eq!(outcome, Some(LineOutcome::Stored(0)));
        // 640 / 320 * 160
        assert_eq!(context.vendor_text().row(0).unwrap().x, 320.0);
    }

    #[test]
    fn test_vendor_glyph_style_activates_glyph_text() {
        let mut options = DisplayOptions::new();
        options.vendor_style = VendorTextStyle::Glyphs;
        let (mut context, _) = open_context(options);

        assert_eq!(context.draw_vendor_text_line(b"ABC", 10, 69), None);
        let source = IndexedSurface::new(4, 4, Default::default());
        assert!(!context.update_overlay(&source, 0, 0));
    }

    #[test]
    fn test_draw_string_marks_leds_dirty() {
        let (mut context, _) = open_context(DisplayOptions::new());
        context.draw_string("HI", 2, 20);
        assert!(context.leds().needs_update());
        // col 2 at 5 pixels per column, glyph pixels in light grey
        let surface = context.leds().surface();
        let lit = (10..22).any(|x| surface.pixel(x, 20) == Some(STRING_COLOR.to_rgba8888()));
        assert!(lit);
    }

    #[test]
    fn test_draw_led_without_scoreboard() {
        let (mut context, _) = open_context(DisplayOptions::new());
        assert!(!context.draw_led(0, 0, 0));
        assert!(!context.draw_othergfx(OtherGfx::Credits, 0, 0));
    }

    #[test]
    fn test_yuv_getters() {
        let (context, _) = open_context(DisplayOptions::new());
        assert_eq!(context.yuv_width(), 0);
        assert!(!context.yuv_ready());
        context.setup_yuv(720, 480).unwrap();
        assert_eq!((context.yuv_width(), context.yuv_height()), (720, 480));
        assert!(!context.yuv_ready());
    }

    #[test]
    fn test_shutdown_enters_terminal_phase() {
        let (mut context, _) = open_context(DisplayOptions::new());
        context.shutdown();
        assert!(!context.is_open());
        assert_eq!(context.phase(), PresentPhase::Shutdown);
    }

    #[test]
    fn test_reconfigure_applies_new_size() {
        let (mut context, mut system) = open_context(DisplayOptions::new());
        context.options_mut().set_video_width(800);
        context.options_mut().set_video_height(600);
        context.reconfigure(&mut system).unwrap();
        assert_eq!((context.draw_width(), context.draw_height()), (800, 600));
        assert_eq!(context.renderer().unwrap().output_size(), (800, 600));
    }
}
