// Bitmap assets - LED digits, scoreboard graphics and glyph strips
//
// Assets are decoded by a `BitmapLoader`; the compositor only sees RGBA
// surfaces. Loading is aggregated: every asset is attempted, failures are
// logged and collected, and the set is complete only if nothing failed.

use super::surface::Surface;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of LED digit bitmaps (`led0` .. `led16`)
pub const LED_RANGE: usize = 17;

/// Errors from loading a single bitmap
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },

    #[error("{path}: unsupported pixel layout {color_type:?}")]
    Unsupported {
        path: PathBuf,
        color_type: png::ColorType,
    },

    #[error("bitmap not provided: {0}")]
    NotFound(String),
}

/// Something that turns an asset name into an RGBA surface
pub trait BitmapLoader {
    /// Load the bitmap called `name` (without extension)
    fn load(&self, name: &str) -> Result<Surface, AssetError>;
}

/// Loads `<dir>/<name>.png` with the png crate
#[derive(Debug, Clone)]
pub struct PngBitmapLoader {
    dir: PathBuf,
}

impl PngBitmapLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BitmapLoader for PngBitmapLoader {
    fn load(&self, name: &str) -> Result<Surface, AssetError> {
        let path = self.dir.join(format!("{}.png", name));
        decode_png(&path)
    }
}

/// Decode a PNG file into an RGBA surface
pub fn decode_png(path: &Path) -> Result<Surface, AssetError> {
    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_err = |source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(decode_err)?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, _) = reader.output_color_type();
    let samples = color_type.samples();
    let mut buf = vec![0u8; width as usize * height as usize * samples];
    let frame = reader.next_frame(&mut buf).map_err(decode_err)?;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for row in buf.chunks(frame.line_size).take(height as usize) {
        for px in row.chunks_exact(samples).take(width as usize) {
            let (r, g, b, a) = match color_type {
                png::ColorType::Rgba => (px[0], px[1], px[2], px[3]),
                png::ColorType::Rgb => (px[0], px[1], px[2], 0xFF),
                png::ColorType::GrayscaleAlpha => (px[0], px[0], px[0], px[1]),
                png::ColorType::Grayscale => (px[0], px[0], px[0], 0xFF),
                other => {
                    return Err(AssetError::Unsupported {
                        path: path.to_path_buf(),
                        color_type: other,
                    })
                }
            };
            pixels.push(u32::from_be_bytes([r, g, b, a]));
        }
    }

    Surface::from_pixels(width, height, pixels).ok_or_else(|| AssetError::Unsupported {
        path: path.to_path_buf(),
        color_type,
    })
}

/// Scoreboard graphics other than LED digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherGfx {
    Player1,
    Player2,
    Lives,
    Credits,
    SaveMe,
    GameNowOok,
}

impl OtherGfx {
    pub const ALL: [OtherGfx; 6] = [
        OtherGfx::Player1,
        OtherGfx::Player2,
        OtherGfx::Lives,
        OtherGfx::Credits,
        OtherGfx::SaveMe,
        OtherGfx::GameNowOok,
    ];

    /// Asset name of the bitmap
    pub fn asset_name(self) -> &'static str {
        match self {
            OtherGfx::Player1 => "player1",
            OtherGfx::Player2 => "player2",
            OtherGfx::Lives => "lives",
            OtherGfx::Credits => "credits",
            OtherGfx::SaveMe => "saveme",
            OtherGfx::GameNowOok => "gamenowook",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every bitmap the compositor draws from
#[derive(Debug, Clone, Default)]
pub struct Assets {
    leds: Vec<Option<Surface>>,
    other: Vec<Option<Surface>>,
    led_strip: Option<Surface>,
    vendor_charmap: Option<Surface>,
    missing: Vec<String>,
}

impl Assets {
    /// Empty set (nothing loaded)
    pub fn empty() -> Self {
        Self {
            leds: vec![None; LED_RANGE],
            other: vec![None; OtherGfx::ALL.len()],
            ..Self::default()
        }
    }

    /// Load every asset
    ///
    /// # Arguments
    /// * `loader` - Bitmap source
    /// * `led_charset` - LED glyph strip variant; 2 selects `overlayleds2`
    pub fn load(loader: &dyn BitmapLoader, led_charset: u8) -> Self {
        let mut assets = Self::empty();

        for n in 0..LED_RANGE {
            assets.leds[n] = assets.attempt(loader, &format!("led{}", n));
        }
        for gfx in OtherGfx::ALL {
            assets.other[gfx.index()] = assets.attempt(loader, gfx.asset_name());
        }

        let strip = if led_charset != 2 { "overlayleds1" } else { "overlayleds2" };
        assets.led_strip = assets.attempt(loader, strip);
        assets.vendor_charmap = assets.attempt(loader, "ldp1450font");

        if assets.all_loaded() {
            log::debug!("All bitmaps loaded");
        } else {
            log::warn!("{} bitmap(s) could not be loaded", assets.missing.len());
        }
        assets
    }

    fn attempt(&mut self, loader: &dyn BitmapLoader, name: &str) -> Option<Surface> {
        match loader.load(name) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::warn!("Could not load bitmap: {}", e);
                self.missing.push(name.to_string());
                None
            }
        }
    }

    /// Whether every asset loaded
    pub fn all_loaded(&self) -> bool {
        self.missing.is_empty()
    }

    /// Names of the assets that failed
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn led(&self, value: usize) -> Option<&Surface> {
        self.leds.get(value).and_then(Option::as_ref)
    }

    pub fn other(&self, which: OtherGfx) -> Option<&Surface> {
        self.other.get(which.index()).and_then(Option::as_ref)
    }

    /// LED glyph strip used by `draw_led_digits`
    pub fn led_strip(&self) -> Option<&Surface> {
        self.led_strip.as_ref()
    }

    /// Vendor character-map bitmap
    pub fn vendor_charmap(&self) -> Option<&Surface> {
        self.vendor_charmap.as_ref()
    }

    /// Replace the LED glyph strip
    pub fn set_led_strip(&mut self, strip: Surface) {
        self.led_strip = Some(strip);
    }

    /// Replace the vendor character map
    pub fn set_vendor_charmap(&mut self, charmap: Surface) {
        self.vendor_charmap = Some(charmap);
    }
}
