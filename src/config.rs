// Video configuration - Persistent display settings
//
// Stored as TOML next to the executable. A missing or unreadable file is
// replaced by defaults, which are written back for the user to edit.

use crate::display::VendorTextStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Configuration file name
const CONFIG_FILE: &str = "video_config.toml";

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Explicit output width; setting it marks the display as resized
    pub width: Option<u32>,
    /// Explicit output height; setting it marks the display as resized
    pub height: Option<u32>,
    pub fullscreen: bool,
    /// Maximised borderless window instead of a mode switch
    pub fake_fullscreen: bool,
    /// Shrink the output towards 4:3
    pub force_aspect_ratio: bool,
    /// Output scale in percent (50-100)
    pub scale_factor: i32,
    pub scanlines: bool,
    /// Use nearest-neighbour scaling in fullscreen
    pub fullscreen_scale_nearest: bool,
    pub rotate_degrees: f32,
    /// LED glyph strip variant (1 or 2)
    pub scoreboard_charset: u8,
    /// Open a separate scoreboard window
    pub software_scoreboard: bool,
    pub vendor_text_style: VendorTextStyle,
    pub screenshot_directory: PathBuf,
    /// Directory holding the bitmap assets
    pub asset_directory: PathBuf,
    /// Presentation rate
    pub target_fps: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            fullscreen: false,
            fake_fullscreen: false,
            force_aspect_ratio: false,
            scale_factor: 100,
            scanlines: false,
            fullscreen_scale_nearest: false,
            rotate_degrees: 0.0,
            scoreboard_charset: 2,
            software_scoreboard: false,
            vendor_text_style: VendorTextStyle::Font,
            screenshot_directory: PathBuf::from("screenshots"),
            asset_directory: PathBuf::from("pics"),
            target_fps: 60,
        }
    }
}

impl VideoConfig {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// and saves it to the file.
    ///
    /// # Returns
    ///
    /// The loaded or default configuration
    pub fn load_or_default() -> Self {
        Self::load_from_or_default(Path::new(CONFIG_FILE))
    }

    /// Same as `load_or_default`, for an explicit path
    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            log::info!("Using default video configuration ({})", e);
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            if let Err(e) = config.save_to(path) {
                log::debug!("Could not write {}: {}", path.display(), e);
            }
            config
        })
    }

    /// Load configuration from file
    ///
    /// # Returns
    ///
    /// Result containing the configuration or an error
    pub fn load() -> Result<Self, io::Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    ///
    /// # Returns
    ///
    /// Result indicating success or error
    pub fn save(&self) -> Result<(), io::Error> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}
