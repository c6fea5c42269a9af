// Display options - The user-facing switches of the display
//
// Set from configuration and from the input layer while running.
// Geometry is recomputed from these whenever the display is (re)opened.

use super::geometry::{DisplayGeometry, ScaleFactor, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::config::VideoConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overlay coordinate system announced by the game
///
/// Games describe their overlay by an aspect code; it decides how vendor
/// text X positions map to draw coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayAspect {
    /// 256 units across
    #[default]
    Standard,
    /// Code 0x96: 320 units across
    Ratio150,
    /// Code 0xB1: 225 units across
    Ratio177,
}

impl OverlayAspect {
    /// Decode the game's aspect code; unknown codes are standard
    pub fn from_code(code: i32) -> Self {
        match code {
            0x96 => OverlayAspect::Ratio150,
            0xB1 => OverlayAspect::Ratio177,
            _ => OverlayAspect::Standard,
        }
    }

    /// Number of horizontal overlay units spanning the draw width
    pub fn horizontal_units(self) -> f64 {
        match self {
            OverlayAspect::Standard => 256.0,
            OverlayAspect::Ratio150 => 320.0,
            OverlayAspect::Ratio177 => 225.0,
        }
    }
}

/// How vendor text lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorTextStyle {
    /// Rows kept in a table and drawn with the fixed-width font every frame
    #[default]
    Font,
    /// Characters mapped through the character-map bitmap into the LED buffer
    Glyphs,
}

/// Runtime display options
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Explicit size; `Some` once the user resized
    pub requested: Option<(u32, u32)>,
    /// Size probed from the playback format
    pub probed: (u32, u32),
    pub fullscreen: bool,
    pub fake_fullscreen: bool,
    pub force_aspect: bool,
    pub scale: ScaleFactor,
    pub scanlines: bool,
    pub scale_nearest: bool,
    /// Counter-clockwise rotation; stored for renderers that support it
    pub rotate_degrees: f32,
    pub aspect: OverlayAspect,
    /// LED glyph strip variant (1 or 2)
    pub led_charset: u8,
    /// Open the secondary scoreboard window when not fullscreen
    pub software_scoreboard: bool,
    pub vendor_style: VendorTextStyle,
    pub screenshot_dir: PathBuf,
}

impl DisplayOptions {
    pub fn new() -> Self {
        Self {
            requested: None,
            probed: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            fullscreen: false,
            fake_fullscreen: false,
            force_aspect: false,
            scale: ScaleFactor::FULL,
            scanlines: false,
            scale_nearest: false,
            rotate_degrees: 0.0,
            aspect: OverlayAspect::Standard,
            led_charset: 2,
            software_scoreboard: false,
            vendor_style: VendorTextStyle::Font,
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }

    /// Validate and set the scale factor
    ///
    /// Out-of-range values are rejected with a warning and 100% is used.
    pub fn set_scale_factor(&mut self, percent: i32) {
        self.scale = ScaleFactor::from_user(percent);
    }

    /// Request a width; marks the display as explicitly resized
    pub fn set_video_width(&mut self, width: u32) {
        let (_, h) = self.requested.unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
        self.requested = Some((width, h));
    }

    /// Request a height; marks the display as explicitly resized
    pub fn set_video_height(&mut self, height: u32) {
        let (w, _) = self.requested.unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
        self.requested = Some((w, height));
    }

    /// Record the width detected from the playback format
    pub fn set_detected_width(&mut self, width: u32) {
        self.probed.0 = width;
    }

    /// Record the height detected from the playback format
    pub fn set_detected_height(&mut self, height: u32) {
        self.probed.1 = height;
    }

    /// Set the overlay aspect from the game's code
    pub fn set_aspect_code(&mut self, code: i32) {
        self.aspect = OverlayAspect::from_code(code);
    }

    /// Compute the geometry these options describe
    pub fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry::configure(
            self.requested,
            self.probed,
            self.fullscreen,
            self.fake_fullscreen,
            self.force_aspect,
            self.scale,
        )
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&VideoConfig> for DisplayOptions {
    fn from(config: &VideoConfig) -> Self {
        let requested = match (config.width, config.height) {
            (None, None) => None,
            (w, h) => Some((w.unwrap_or(DEFAULT_WIDTH), h.unwrap_or(DEFAULT_HEIGHT))),
        };

        Self {
            requested,
            probed: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            fullscreen: config.fullscreen,
            fake_fullscreen: config.fake_fullscreen,
            force_aspect: config.force_aspect_ratio,
            scale: ScaleFactor::from_user(config.scale_factor),
            scanlines: config.scanlines,
            scale_nearest: config.fullscreen_scale_nearest,
            rotate_degrees: config.rotate_degrees,
            aspect: OverlayAspect::Standard,
            led_charset: config.scoreboard_charset,
            software_scoreboard: config.software_scoreboard,
            vendor_style: config.vendor_text_style,
            screenshot_dir: config.screenshot_directory.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DisplayOptions::new();
        assert_eq!(options.requested, None);
        assert_eq!(options.geometry().draw_size(), (640, 480));
    }

    #[test]
    fn test_set_video_width_marks_resized() {
        let mut options = DisplayOptions::new();
        options.set_detected_width(720);
        options.set_video_width(800);
        assert_eq!(options.requested, Some((800, 480)));
        assert_eq!(options.geometry().draw_width, 800);
    }

    #[test]
    fn test_invalid_scale_factor_resets() {
        let mut options = DisplayOptions::new();
        options.set_scale_factor(75);
        assert_eq!(options.scale.percent(), 75);
        options.set_scale_factor(120);
        assert_eq!(options.scale.percent(), 100);
    }

    #[test]
    fn test_aspect_codes() {
        assert_eq!(OverlayAspect::from_code(0x96), OverlayAspect::Ratio150);
        assert_eq!(OverlayAspect::from_code(0xB1), OverlayAspect::Ratio177);
        assert_eq!(OverlayAspect::from_code(0), OverlayAspect::Standard);
        assert_eq!(OverlayAspect::Ratio177.horizontal_units(), 225.0);
    }

    #[test]
    fn test_from_config() {
        let mut config = VideoConfig::default();
        config.width = Some(1024);
        config.scale_factor = 10;
        let options = DisplayOptions::from(&config);
        assert_eq!(options.requested, Some((1024, 480)));
        assert_eq!(options.scale, ScaleFactor::FULL);
    }
}
