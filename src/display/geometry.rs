// Display geometry - Output size from requested/probed resolution
//
// Resolution precedence: explicitly requested dimensions win over the
// dimensions probed from the video stream. Aspect enforcement only ever
// shrinks the larger dimension towards 4:3, then the user scale factor
// (50-100%) is applied.

use thiserror::Error;

/// Default video width before anything is requested or probed
pub const DEFAULT_WIDTH: u32 = 640;

/// Default video height before anything is requested or probed
pub const DEFAULT_HEIGHT: u32 = 480;

/// Smallest accepted scale factor (percent)
pub const MIN_SCALE_FACTOR: i32 = 50;

/// Largest accepted scale factor (percent)
pub const MAX_SCALE_FACTOR: i32 = 100;

/// Rejected scale factor value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scale factor {0} outside 50..=100")]
pub struct InvalidScaleFactor(pub i32);

/// Image scale in percent, always within 50..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleFactor(u32);

impl ScaleFactor {
    /// Full size
    pub const FULL: ScaleFactor = ScaleFactor(100);

    /// Validate a scale factor
    pub fn new(percent: i32) -> Result<Self, InvalidScaleFactor> {
        if (MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&percent) {
            Ok(ScaleFactor(percent as u32))
        } else {
            Err(InvalidScaleFactor(percent))
        }
    }

    /// Accept a user-supplied value, falling back to 100% with a warning
    pub fn from_user(percent: i32) -> Self {
        Self::new(percent).unwrap_or_else(|e| {
            log::warn!("Invalid scale value ({}). Ignoring scale factor.", e);
            Self::FULL
        })
    }

    /// Percentage value
    pub fn percent(self) -> u32 {
        self.0
    }

    /// Scale one dimension, truncating
    #[inline]
    pub fn apply(self, value: u32) -> u32 {
        (value as u64 * self.0 as u64 / 100) as u32
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::FULL
    }
}

/// How the output window covers the desktop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullscreenMode {
    /// Ordinary window sized to the draw dimensions
    #[default]
    Windowed,
    /// Desktop-resolution fullscreen
    Fullscreen,
    /// Maximised borderless window
    FakeFullscreen,
}

impl FullscreenMode {
    /// Resolve the two user flags; real fullscreen wins over fake fullscreen
    pub fn from_flags(fullscreen: bool, fake_fullscreen: bool) -> Self {
        if fullscreen {
            FullscreenMode::Fullscreen
        } else if fake_fullscreen {
            FullscreenMode::FakeFullscreen
        } else {
            FullscreenMode::Windowed
        }
    }

    /// Whether the renderer needs a logical size (desktop-sized output)
    pub fn covers_desktop(self) -> bool {
        !matches!(self, FullscreenMode::Windowed)
    }
}

/// Output geometry computed from the display options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    /// Explicitly requested dimensions, if the user resized
    pub requested: Option<(u32, u32)>,
    /// Dimensions probed from the playback format
    pub probed: (u32, u32),
    /// Final window/render width
    pub draw_width: u32,
    /// Final window/render height
    pub draw_height: u32,
    pub mode: FullscreenMode,
    pub scale: ScaleFactor,
    pub force_aspect: bool,
}

impl DisplayGeometry {
    /// Compute the draw dimensions
    ///
    /// # Arguments
    /// * `requested` - Dimensions the user asked for (`None` = not resized)
    /// * `probed` - Dimensions detected from the video stream
    /// * `fullscreen` / `fake_fullscreen` - Window mode flags
    /// * `force_aspect` - Shrink the larger dimension to reach 4:3
    /// * `scale` - Scale factor applied last
    pub fn configure(
        requested: Option<(u32, u32)>,
        probed: (u32, u32),
        fullscreen: bool,
        fake_fullscreen: bool,
        force_aspect: bool,
        scale: ScaleFactor,
    ) -> Self {
        let (mut w, mut h) = requested.unwrap_or(probed);

        if force_aspect {
            (w, h) = enforce_four_by_three(w, h);
        }

        w = scale.apply(w).max(1);
        h = scale.apply(h).max(1);

        Self {
            requested,
            probed,
            draw_width: w,
            draw_height: h,
            mode: FullscreenMode::from_flags(fullscreen, fake_fullscreen),
            scale,
            force_aspect,
        }
    }

    /// Draw dimensions as a pair
    pub fn draw_size(&self) -> (u32, u32) {
        (self.draw_width, self.draw_height)
    }
}

/// Shrink the larger dimension so that `w:h` becomes 4:3 (never grows)
pub fn enforce_four_by_three(w: u32, h: u32) -> (u32, u32) {
    let (w64, h64) = (w as u64, h as u64);

    if w64 * 3 < h64 * 4 {
        // Narrower than 4:3, too tall
        (w, (w64 * 3 / 4) as u32)
    } else if w64 * 3 > h64 * 4 {
        // Wider than 4:3
        ((h64 * 4 / 3) as u32, h)
    } else {
        (w, h)
    }
}
