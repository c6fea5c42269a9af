// YUV frame buffer - Planar 4:2:0 store shared with the decode thread
//
// The decode thread writes whole planes through `update`; the presenter
// picks them up once per frame with `consume_if_dirty`. Every field lives
// behind one mutex, and the decode thread's critical section is a plain
// memory copy.

use crate::render::YuvPlanes;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Luma value of black
pub const BLANK_LUMA: u8 = 0x10;

/// Chroma value of black (both planes)
pub const BLANK_CHROMA: u8 = 0x80;

/// Errors reported to the decode thread
#[derive(Debug, Error, PartialEq, Eq)]
pub enum YuvError {
    #[error("invalid YUV dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("YUV buffer has not been set up")]
    NotConfigured,

    #[error("{plane} plane too small: need {needed} bytes, got {actual}")]
    PlaneTooSmall {
        plane: char,
        needed: usize,
        actual: usize,
    },
}

/// One allocation of YUV planes
#[derive(Debug)]
pub struct YuvFrame {
    width: u32,
    height: u32,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
    y_pitch: usize,
    u_pitch: usize,
    v_pitch: usize,
    needs_update: bool,
    generation: u64,
}

impl YuvFrame {
    fn new(width: u32, height: u32, generation: u64) -> Self {
        let y_size = width as usize * height as usize;
        let c_size = y_size / 4;

        Self {
            width,
            height,
            y: vec![0; y_size],
            u: vec![0; c_size],
            v: vec![0; c_size],
            y_pitch: width as usize,
            u_pitch: width as usize / 2,
            v_pitch: width as usize / 2,
            needs_update: false,
            generation,
        }
    }

    fn fill_blank(&mut self) {
        self.y.fill(BLANK_LUMA);
        self.u.fill(BLANK_CHROMA);
        self.v.fill(BLANK_CHROMA);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn y_plane(&self) -> &[u8] {
        &self.y
    }

    pub fn u_plane(&self) -> &[u8] {
        &self.u
    }

    pub fn v_plane(&self) -> &[u8] {
        &self.v
    }

    /// Pitches recorded by the last copy (Y, U, V)
    pub fn pitches(&self) -> (usize, usize, usize) {
        (self.y_pitch, self.u_pitch, self.v_pitch)
    }

    /// New data is waiting to reach the texture
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Identifies the allocation; changes on every `setup`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Borrow the planes for a texture upload
    pub fn planes(&self) -> YuvPlanes<'_> {
        YuvPlanes {
            y: &self.y,
            u: &self.u,
            v: &self.v,
            y_pitch: self.y_pitch,
            u_pitch: self.u_pitch,
            v_pitch: self.v_pitch,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    frame: Option<YuvFrame>,
    needs_blank: bool,
    generations: u64,
}

/// Handle to the shared YUV buffer
///
/// Clones share the same buffer; one clone goes to the decode thread.
#[derive(Debug, Clone, Default)]
pub struct YuvFrameBuffer {
    shared: Arc<Mutex<Shared>>,
}

impl YuvFrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking decoder must not take the display down with it.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate planes for a new resolution
    ///
    /// Any previous allocation is dropped. The presenter notices the new
    /// generation and destroys the texture of the old one.
    ///
    /// # Arguments
    /// * `width` - Luma width in pixels
    /// * `height` - Luma height in pixels
    pub fn setup(&self, width: u32, height: u32) -> Result<(), YuvError> {
        if width == 0 || height == 0 {
            return Err(YuvError::InvalidDimensions { width, height });
        }

        let mut shared = self.lock();
        shared.generations += 1;
        let generation = shared.generations;
        shared.frame = Some(YuvFrame::new(width, height, generation));

        log::debug!("YUV buffer set up at {}x{} (generation {})", width, height, generation);
        Ok(())
    }

    /// Store a decoded frame
    ///
    /// Copies each plane in full, or writes black if a blank was requested.
    /// Never touches the renderer.
    ///
    /// # Arguments
    /// * `y`, `u`, `v` - Planes; at least W·H, W·H/4 and W·H/4 bytes
    /// * `y_pitch`, `u_pitch`, `v_pitch` - Bytes per row of each plane
    pub fn update(
        &self,
        y: &[u8],
        u: &[u8],
        v: &[u8],
        y_pitch: usize,
        u_pitch: usize,
        v_pitch: usize,
    ) -> Result<(), YuvError> {
        let mut shared = self.lock();
        let blank = shared.needs_blank;
        let frame = shared.frame.as_mut().ok_or(YuvError::NotConfigured)?;

        if blank {
            frame.fill_blank();
        } else {
            let (y_len, u_len, v_len) = (frame.y.len(), frame.u.len(), frame.v.len());
            for (plane, needed, actual) in [
                ('Y', y_len, y.len()),
                ('U', u_len, u.len()),
                ('V', v_len, v.len()),
            ] {
                if actual < needed {
                    return Err(YuvError::PlaneTooSmall {
                        plane,
                        needed,
                        actual,
                    });
                }
            }

            frame.y.copy_from_slice(&y[..y_len]);
            frame.u.copy_from_slice(&u[..u_len]);
            frame.v.copy_from_slice(&v[..v_len]);
            frame.y_pitch = y_pitch;
            frame.u_pitch = u_pitch;
            frame.v_pitch = v_pitch;
        }

        frame.needs_update = true;
        shared.needs_blank = false;
        Ok(())
    }

    /// Make the next `update` write black instead of copying
    pub fn request_blank(&self) {
        self.lock().needs_blank = true;
    }

    /// Whether a blank is pending
    pub fn blank_requested(&self) -> bool {
        self.lock().needs_blank
    }

    /// Upload pending data
    ///
    /// Runs `upload` with the locked frame when new data is waiting, and
    /// clears the flag when it succeeds. Returns whether an upload ran.
    pub fn consume_if_dirty<E>(
        &self,
        upload: impl FnOnce(&YuvFrame) -> Result<(), E>,
    ) -> Result<bool, E> {
        let mut shared = self.lock();
        let Some(frame) = shared.frame.as_mut() else {
            return Ok(false);
        };
        if !frame.needs_update {
            return Ok(false);
        }

        upload(frame)?;
        frame.needs_update = false;
        Ok(true)
    }

    /// Force the next presented frame to upload the planes again
    ///
    /// Used after the display was reopened and its textures are gone.
    pub(crate) fn mark_dirty(&self) {
        if let Some(frame) = self.lock().frame.as_mut() {
            frame.needs_update = true;
        }
    }

    /// Run `f` with the current frame, if any
    pub fn with_frame<R>(&self, f: impl FnOnce(&YuvFrame) -> R) -> Option<R> {
        self.lock().frame.as_ref().map(f)
    }

    /// Generation of the current allocation
    pub fn generation(&self) -> Option<u64> {
        self.lock().frame.as_ref().map(|f| f.generation)
    }

    /// Current dimensions
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.lock().frame.as_ref().map(|f| (f.width, f.height))
    }

    /// Drop the planes
    pub fn release(&self) {
        let mut shared = self.lock();
        if shared.frame.take().is_some() {
            log::debug!("YUV buffer released");
        }
    }
}
