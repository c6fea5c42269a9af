// Window module - Desktop windows and presentation
//
// This module provides the winit + pixels window system, a renderer that
// composes in software and presents through a pixels surface, and the
// event-loop handler that drives the compositor frame by frame.

use super::{DisplayError, FullscreenMode, OutputWindow, WindowFlags, WindowRequest, WindowSystem};
use crate::error::VideoError;
use crate::render::{
    BlendMode, Capture, Color, PixelFormat, Rect, RenderError, RenderStats, Renderer,
    ScaleQuality, SoftwareRenderer, TextureId, YuvPlanes,
};
use crate::video::DisplayContext;
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId, WindowLevel};

/// Event loop configuration
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Target frame rate in Hz
    pub target_fps: u32,
    /// Whether to enable VSync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a new window configuration with default values
    ///
    /// Default: 60 FPS, VSync enabled
    pub fn new() -> Self {
        Self {
            target_fps: 60,
            vsync: true,
        }
    }

    /// Set the target frame rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    /// Set VSync enabled or disabled
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Get the frame duration for the target FPS
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Window system backed by the running winit event loop
pub struct WinitWindowSystem<'a> {
    event_loop: &'a ActiveEventLoop,
    opened: Vec<WindowId>,
}

impl<'a> WinitWindowSystem<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop) -> Self {
        Self {
            event_loop,
            opened: Vec::new(),
        }
    }

    /// Ids of the windows opened so far, in order
    pub fn opened(&self) -> &[WindowId] {
        &self.opened
    }
}

impl WindowSystem for WinitWindowSystem<'_> {
    fn open_window(
        &mut self,
        request: &WindowRequest,
    ) -> Result<Box<dyn OutputWindow>, DisplayError> {
        let mut attributes = Window::default_attributes()
            .with_title(request.title.clone())
            .with_inner_size(LogicalSize::new(request.width, request.height))
            .with_resizable(false);

        attributes = match request.mode {
            FullscreenMode::Windowed => attributes,
            FullscreenMode::Fullscreen => {
                attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
            }
            FullscreenMode::FakeFullscreen => attributes
                .with_maximized(true)
                .with_decorations(false)
                .with_resizable(true),
        };
        if let Some((x, y)) = request.position {
            attributes = attributes.with_position(LogicalPosition::new(x, y));
        }
        if request.always_on_top {
            attributes = attributes.with_window_level(WindowLevel::AlwaysOnTop);
        }

        let window = self
            .event_loop
            .create_window(attributes)
            .map_err(|e| DisplayError::WindowCreation(e.to_string()))?;

        self.opened.push(window.id());
        Ok(Box::new(WinitWindow {
            window: Arc::new(window),
        }))
    }
}

/// Desktop window
pub struct WinitWindow {
    window: Arc<Window>,
}

impl WinitWindow {
    pub fn id(&self) -> WindowId {
        self.window.id()
    }
}

impl OutputWindow for WinitWindow {
    fn create_renderer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Renderer>, DisplayError> {
        let window_size = self.window.inner_size();

        // Create surface texture using Arc<Window> for safe 'static lifetime
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, self.window.clone());

        let pixels = Pixels::new(width, height, surface_texture)
            .map_err(|e| DisplayError::RendererCreation(e.to_string()))?;

        Ok(Box::new(PixelsRenderer::new(pixels, width, height)))
    }

    fn flags(&self) -> WindowFlags {
        WindowFlags {
            fullscreen: self.window.fullscreen().is_some(),
            maximized: self.window.is_maximized(),
        }
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), DisplayError> {
        if !fullscreen {
            self.window.set_fullscreen(None);
            return Ok(());
        }
        if self.window.current_monitor().is_none() {
            return Err(DisplayError::Fullscreen(
                "window is not on any monitor".to_string(),
            ));
        }
        self.window
            .set_fullscreen(Some(Fullscreen::Borderless(None)));
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        // The size may arrive later as a Resized event
        let _ = self
            .window
            .request_inner_size(LogicalSize::new(width, height));
    }

    fn center(&mut self) {
        let Some(monitor) = self.window.current_monitor() else {
            return;
        };
        let area = monitor.size();
        let origin = monitor.position();
        let size = self.window.outer_size();
        let x = origin.x + (area.width as i32 - size.width as i32) / 2;
        let y = origin.y + (area.height as i32 - size.height as i32) / 2;
        self.window
            .set_outer_position(PhysicalPosition::new(x, y));
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Renderer composing in software and presenting through pixels
pub struct PixelsRenderer {
    pixels: Pixels<'static>,
    inner: SoftwareRenderer,
}

impl PixelsRenderer {
    pub fn new(pixels: Pixels<'static>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            inner: SoftwareRenderer::new(width, height),
        }
    }

    /// Copy the presented frame into the pixels buffer
    fn upload_frame(&mut self) {
        let frame = self.pixels.frame_mut();
        for (dst, &word) in frame.chunks_exact_mut(4).zip(self.inner.frame()) {
            dst.copy_from_slice(&word.to_be_bytes());
        }
    }
}

impl Renderer for PixelsRenderer {
    fn create_texture(
        &mut self,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TextureId, RenderError> {
        self.inner.create_texture(format, width, height)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.inner.destroy_texture(id);
    }

    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.inner.texture_size(id)
    }

    fn set_texture_blend_mode(
        &mut self,
        id: TextureId,
        mode: BlendMode,
    ) -> Result<(), RenderError> {
        self.inner.set_texture_blend_mode(id, mode)
    }

    fn update_texture(
        &mut self,
        id: TextureId,
        rect: Option<Rect>,
        pixels: &[u32],
        pitch: usize,
    ) -> Result<(), RenderError> {
        self.inner.update_texture(id, rect, pixels, pitch)
    }

    fn update_yuv_texture(
        &mut self,
        id: TextureId,
        planes: YuvPlanes<'_>,
    ) -> Result<(), RenderError> {
        self.inner.update_yuv_texture(id, planes)
    }

    fn copy(
        &mut self,
        id: TextureId,
        src: Option<Rect>,
        dst: Option<Rect>,
    ) -> Result<(), RenderError> {
        self.inner.copy(id, src, dst)
    }

    fn set_draw_color(&mut self, color: Color) {
        self.inner.set_draw_color(color);
    }

    fn set_draw_blend_mode(&mut self, mode: BlendMode) {
        self.inner.set_draw_blend_mode(mode);
    }

    fn draw_blend_mode(&self) -> BlendMode {
        self.inner.draw_blend_mode()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.inner.draw_line(x1, y1, x2, y2);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.inner.fill_rect(rect);
    }

    fn set_logical_size(&mut self, width: u32, height: u32) {
        self.inner.set_logical_size(width, height);
        let (w, h) = self.inner.output_size();
        if let Err(e) = self.pixels.resize_buffer(w, h) {
            log::warn!("Could not resize pixel buffer to {}x{}: {}", w, h, e);
        }
    }

    fn output_size(&self) -> (u32, u32) {
        self.inner.output_size()
    }

    fn set_scale_quality(&mut self, quality: ScaleQuality) {
        // pixels always scales with nearest-neighbour
        self.inner.set_scale_quality(quality);
    }

    fn scale_quality(&self) -> ScaleQuality {
        self.inner.scale_quality()
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.inner.present()?;
        self.upload_frame();
        self.pixels
            .render()
            .map_err(|e| RenderError::Present(e.to_string()))
    }

    fn window_resized(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Err(e) = self.pixels.resize_surface(width, height) {
            log::warn!("Could not resize surface to {}x{}: {}", width, height, e);
        }
    }

    fn read_pixels(&self) -> Result<Capture, RenderError> {
        self.inner.read_pixels()
    }

    fn stats(&self) -> RenderStats {
        self.inner.stats()
    }
}

/// Event-loop handler driving a `DisplayContext`
///
/// `hook` runs once per frame before composition; it is where game logic
/// draws LEDs, overlays and text.
pub struct CompositorWindow<F>
where
    F: FnMut(&mut DisplayContext),
{
    context: DisplayContext,
    hook: F,
    config: WindowConfig,
    primary: Option<WindowId>,
    last_frame_time: Instant,
    error: Option<VideoError>,
}

impl<F> CompositorWindow<F>
where
    F: FnMut(&mut DisplayContext),
{
    pub fn new(context: DisplayContext, config: WindowConfig, hook: F) -> Self {
        Self {
            context,
            hook,
            config,
            primary: None,
            last_frame_time: Instant::now(),
            error: None,
        }
    }

    pub fn context(&self) -> &DisplayContext {
        &self.context
    }

    /// The fatal error that ended the loop, if any
    pub fn take_error(&mut self) -> Option<VideoError> {
        self.error.take()
    }

    /// Tear everything down and leave the loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: VideoError) {
        log::error!("{}", error);
        self.context.shutdown();
        self.error = Some(error);
        event_loop.exit();
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) {
        let mut system = WinitWindowSystem::new(event_loop);
        match self.context.open(&mut system) {
            Ok(()) => {
                self.primary = system.opened().first().copied();
                self.context.request_redraw();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: PhysicalKey) {
        match key {
            PhysicalKey::Code(KeyCode::F11) => self.context.toggle_fullscreen(),
            PhysicalKey::Code(KeyCode::F12) => self.context.queue_screenshot(),
            PhysicalKey::Code(KeyCode::F10) => self.context.toggle_scanlines(),
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            _ => {}
        }
    }

    /// Check if enough time has passed for the next frame
    fn should_render_frame(&mut self) -> bool {
        let elapsed = self.last_frame_time.elapsed();
        let frame_duration = self.config.frame_duration();

        if elapsed >= frame_duration {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl<F> ApplicationHandler for CompositorWindow<F>
where
    F: FnMut(&mut DisplayContext),
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.context.is_open() || self.error.is_some() {
            return;
        }
        self.open(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, physical_key),
            WindowEvent::Resized(size) if Some(window_id) == self.primary => {
                self.context.window_resized(size.width, size.height);
            }
            WindowEvent::RedrawRequested if Some(window_id) == self.primary => {
                if self.should_render_frame() {
                    (self.hook)(&mut self.context);
                    if let Err(e) = self.context.present_frame() {
                        self.fail(event_loop, e);
                        return;
                    }
                }

                // Request next frame
                self.context.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.context.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.context.shutdown();
    }
}

/// Open the display and run the event loop until the user quits
///
/// # Arguments
/// * `context` - Compositor state, not yet opened
/// * `config` - Frame rate and VSync
/// * `hook` - Per-frame game logic
///
/// # Returns
/// Result indicating success or the fatal error that ended the loop
pub fn run_display<F>(
    context: DisplayContext,
    config: WindowConfig,
    hook: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnMut(&mut DisplayContext),
{
    let event_loop = EventLoop::new()?;

    // Set control flow based on VSync setting
    if config.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    let mut app = CompositorWindow::new(context, config, hook);

    log::info!(
        "Starting display: target {} FPS, VSync {}",
        config.target_fps,
        config.vsync
    );
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
