// Hypseus Video Library
// Real-time video compositor for a laserdisc arcade emulator

// Public modules
pub mod config;
pub mod display;
pub mod error;
pub mod render;
pub mod video;

// Re-export main types for convenience
pub use config::VideoConfig;
pub use display::{
    run_display, DisplayError, DisplayGeometry, DisplayOptions, HeadlessWindowSystem,
    OutputWindow, WindowConfig, WindowSystem,
};
pub use error::VideoError;
pub use render::{Renderer, SoftwareRenderer};
pub use video::{
    Assets, DisplayContext, FrameReport, IndexedSurface, Palette, PngBitmapLoader, Surface,
    YuvFrameBuffer,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that the main components can be instantiated
        let options = DisplayOptions::from(&VideoConfig::default());
        let _context = DisplayContext::new(options, 320, 240);
        let _buffer = YuvFrameBuffer::new();
        let _renderer = SoftwareRenderer::new(640, 480);
        let _system = HeadlessWindowSystem::new();
    }
}
