// Error types - Failures that end the display session
//
// Steady-state problems (a failed texture update, a refused screenshot)
// are logged where they happen. Only the failures below travel up to the
// single top-level handler, which tears the display down and exits.

use crate::display::DisplayError;
use crate::render::RenderError;
use crate::video::assets::AssetError;
use thiserror::Error;

/// Fatal compositor errors
#[derive(Debug, Error)]
pub enum VideoError {
    /// Window or renderer could not be acquired
    #[error(transparent)]
    Display(#[from] DisplayError),

    /// A required texture could not be created
    #[error("could not create {what} texture: {source}")]
    Texture {
        what: &'static str,
        #[source]
        source: RenderError,
    },

    /// The presented frame could not be read back for a screenshot
    #[error("cannot read pixels: {0}")]
    Readback(#[source] RenderError),

    /// A required asset could not be loaded
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// An operation needed an open display
    #[error("display is not open")]
    NotOpen,
}

impl VideoError {
    pub(crate) fn texture(what: &'static str) -> impl FnOnce(RenderError) -> VideoError {
        move |source| VideoError::Texture { what, source }
    }
}
