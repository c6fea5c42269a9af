// Display module - Output windows, geometry and display options
//
// This module provides:
// - Geometry computation (requested/probed size, 4:3 enforcement, scale factor)
// - Runtime display options (the user-facing switches)
// - The window system abstraction the compositor opens its windows through
// - A winit + pixels window system and an off-screen one

pub mod geometry;
pub mod headless;
pub mod options;
pub mod window;

pub use geometry::{DisplayGeometry, FullscreenMode, InvalidScaleFactor, ScaleFactor};
pub use headless::{HeadlessWindow, HeadlessWindowSystem};
pub use options::{DisplayOptions, OverlayAspect, VendorTextStyle};
pub use window::{run_display, CompositorWindow, PixelsRenderer, WindowConfig, WinitWindow, WinitWindowSystem};

use crate::render::Renderer;
use thiserror::Error;

/// Errors reported by a window system
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The OS window could not be created
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// No renderer could be attached to the window
    #[error("renderer creation failed: {0}")]
    RendererCreation(String),

    /// Switching fullscreen mode failed
    #[error("fullscreen switch failed: {0}")]
    Fullscreen(String),
}

/// Parameters for opening a window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRequest {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mode: FullscreenMode,
    /// Fixed position; `None` lets the window system decide
    pub position: Option<(i32, i32)>,
    pub always_on_top: bool,
}

impl WindowRequest {
    /// Plain windowed request
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            mode: FullscreenMode::Windowed,
            position: None,
            always_on_top: false,
        }
    }
}

/// Window state relevant to the compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowFlags {
    pub fullscreen: bool,
    pub maximized: bool,
}

/// Something that can open output windows
pub trait WindowSystem {
    /// Open a window
    fn open_window(
        &mut self,
        request: &WindowRequest,
    ) -> Result<Box<dyn OutputWindow>, DisplayError>;
}

/// An open output window
pub trait OutputWindow {
    /// Attach a renderer whose target is `width`×`height` logical pixels
    fn create_renderer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Renderer>, DisplayError>;

    /// Current window state
    fn flags(&self) -> WindowFlags;

    /// Enter or leave desktop fullscreen
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), DisplayError>;

    /// Resize the client area
    fn set_size(&mut self, width: u32, height: u32);

    /// Move the window to the centre of its monitor
    fn center(&mut self);

    /// Show or hide the mouse cursor over the window
    fn set_cursor_visible(&mut self, visible: bool);

    /// Hide the window
    fn hide(&mut self);

    /// Ask for another redraw event; windows without an event loop ignore it
    fn request_redraw(&self) {}
}
