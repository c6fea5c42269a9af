// Screenshot functionality
//
// Saves the last presented frame as `hypseus-<N>.png`, N being the smallest
// positive number not yet used in the screenshot directory.

use crate::render::Capture;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during screenshot operations
#[derive(Debug, Error)]
pub enum ScreenshotError {
    /// The screenshot directory is missing
    #[error("'{0}' directory does not exist.")]
    MissingDirectory(PathBuf),

    /// The screenshot path exists but is not a directory
    #[error("'{0}' is not a directory.")]
    NotADirectory(PathBuf),

    /// Screenshots of desktop-sized output are refused
    #[error("Cannot screenshot in fullscreen render.")]
    Fullscreen,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}

/// Check that `dir` exists and is a directory
pub fn check_directory(dir: &Path) -> Result<(), ScreenshotError> {
    match fs::metadata(dir) {
        Err(_) => Err(ScreenshotError::MissingDirectory(dir.to_path_buf())),
        Ok(meta) if !meta.is_dir() => Err(ScreenshotError::NotADirectory(dir.to_path_buf())),
        Ok(_) => Ok(()),
    }
}

/// First unused `hypseus-<N>.png` path in `dir`
pub fn next_screenshot_path(dir: &Path) -> PathBuf {
    (1u32..)
        .map(|n| dir.join(format!("hypseus-{}.png", n)))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join("hypseus-0.png"))
}

/// Save a captured frame into `dir`
///
/// # Arguments
///
/// * `capture` - Frame read back from the renderer
/// * `dir` - Screenshot directory (must exist)
///
/// # Returns
///
/// Result containing the path to the saved screenshot or an error
pub fn save_screenshot(capture: &Capture, dir: &Path) -> Result<PathBuf, ScreenshotError> {
    check_directory(dir)?;
    let path = next_screenshot_path(dir);
    save_png(&path, &capture.to_rgb_bytes(), capture.width, capture.height)?;
    Ok(path)
}

/// Save RGB data as a PNG file
///
/// # Arguments
///
/// * `path` - Path to save the PNG file
/// * `data` - RGB data (width × height × 3 bytes)
/// * `width` - Image width
/// * `height` - Image height
pub fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_path_fills_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        for n in [1, 2, 4] {
            fs::write(dir.path().join(format!("hypseus-{}.png", n)), b"").unwrap();
        }
        assert_eq!(next_screenshot_path(dir.path()), dir.path().join("hypseus-3.png"));
    }

    #[test]
    fn test_check_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_directory(dir.path()).is_ok());

        let missing = dir.path().join("nope");
        assert!(matches!(
            check_directory(&missing),
            Err(ScreenshotError::MissingDirectory(_))
        ));

        let file = dir.path().join("file");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            check_directory(&file),
            Err(ScreenshotError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_save_screenshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let capture = Capture {
            width: 2,
            height: 2,
            pixels: vec![0xFF0000FF; 4],
        };
        let path = save_screenshot(&capture, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("hypseus-1.png"));

        let decoder = png::Decoder::new(io::BufReader::new(fs::File::open(&path).unwrap()));
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 2);
        assert_eq!(reader.info().color_type, png::ColorType::Rgb);
    }
}
