// Video module - The laserdisc video compositor
//
// This module provides:
// - The shared YUV frame buffer written by the decode thread
// - Overlay, LED and vendor text buffers written by game logic
// - The display context owning all of it, and the per-frame presenter
// - Scanlines, subtitles, screenshots and the scoreboard window
//
// Everything except the YUV frame buffer lives on the presentation thread.

pub mod assets;
pub mod context;
pub mod font;
pub mod led;
pub mod overlay;
pub mod palette;
pub mod presenter;
pub mod scanlines;
pub mod scoreboard;
pub mod screenshot;
pub mod subtitle;
pub mod surface;
pub mod test_pattern;
pub mod textures;
pub mod vendor_text;
pub mod yuv;

pub use assets::{AssetError, Assets, BitmapLoader, OtherGfx, PngBitmapLoader};
pub use context::DisplayContext;
pub use font::{BitmapFont, FontKind, FontService, FontSizes};
pub use led::LedOverlayBuffer;
pub use overlay::OverlayBuffer;
pub use palette::{IndexedSurface, Palette};
pub use presenter::{FrameReport, PresentPhase};
pub use scoreboard::ScoreboardDisplay;
pub use screenshot::ScreenshotError;
pub use subtitle::SubtitleState;
pub use surface::Surface;
pub use test_pattern::TestFrame;
pub use vendor_text::{LineOutcome, VendorRow, VendorTextTable};
pub use yuv::{YuvError, YuvFrame, YuvFrameBuffer};
