// Headless window system - Off-screen windows backed by SoftwareRenderer
//
// Useful for rendering without a desktop (tests, frame dumps). Windows
// only record their state; renderers are plain software renderers.

use super::{DisplayError, OutputWindow, WindowFlags, WindowRequest, WindowSystem};
use crate::display::FullscreenMode;
use crate::render::{Renderer, SoftwareRenderer};

/// Window system that opens off-screen windows
#[derive(Debug, Clone, Default)]
pub struct HeadlessWindowSystem {
    requests: Vec<WindowRequest>,
    fail_window: bool,
    fail_renderer: bool,
    fullscreen_unsupported: bool,
}

impl HeadlessWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every window request
    pub fn without_windows(mut self) -> Self {
        self.fail_window = true;
        self
    }

    /// Open windows, but refuse to attach renderers to them
    pub fn without_renderers(mut self) -> Self {
        self.fail_renderer = true;
        self
    }

    /// Open windows that cannot switch to fullscreen
    pub fn without_fullscreen(mut self) -> Self {
        self.fullscreen_unsupported = true;
        self
    }

    /// Every window request received so far
    pub fn requests(&self) -> &[WindowRequest] {
        &self.requests
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn open_window(
        &mut self,
        request: &WindowRequest,
    ) -> Result<Box<dyn OutputWindow>, DisplayError> {
        self.requests.push(request.clone());

        if self.fail_window {
            return Err(DisplayError::WindowCreation(
                "headless window system has no windows".to_string(),
            ));
        }

        Ok(Box::new(HeadlessWindow {
            width: request.width,
            height: request.height,
            flags: WindowFlags {
                fullscreen: request.mode == FullscreenMode::Fullscreen,
                maximized: request.mode == FullscreenMode::FakeFullscreen,
            },
            cursor_visible: true,
            visible: true,
            fail_renderer: self.fail_renderer,
            fullscreen_unsupported: self.fullscreen_unsupported,
        }))
    }
}

/// Off-screen window
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    flags: WindowFlags,
    cursor_visible: bool,
    visible: bool,
    fail_renderer: bool,
    fullscreen_unsupported: bool,
}

impl HeadlessWindow {
    /// Client area size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

impl OutputWindow for HeadlessWindow {
    fn create_renderer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Renderer>, DisplayError> {
        if self.fail_renderer {
            return Err(DisplayError::RendererCreation(
                "headless window refuses renderers".to_string(),
            ));
        }
        Ok(Box::new(SoftwareRenderer::new(width, height)))
    }

    fn flags(&self) -> WindowFlags {
        self.flags
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), DisplayError> {
        if self.fullscreen_unsupported {
            return Err(DisplayError::Fullscreen(
                "no display mode available".to_string(),
            ));
        }
        self.flags.fullscreen = fullscreen;
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn center(&mut self) {}

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}
