// Subtitles - Timed subtitle line drawn near the bottom of the frame

/// Frames after insertion during which the subtitle is suppressed
pub const SUBTITLE_SUPPRESS_FRAMES: u32 = 2;

/// Frames after which an unrefreshed subtitle is hidden
pub const SUBTITLE_LIFETIME_FRAMES: u32 = 100;

/// Current subtitle and its frame counter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleState {
    text: String,
    visible: bool,
    count: u32,
}

impl SubtitleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a new subtitle, restarting the frame counter
    ///
    /// The insertion itself counts as the first frame.
    pub fn insert(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
        self.count = 1;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Advance one presented frame
    ///
    /// # Returns
    /// The text to draw on this frame, if any. The frame on which the
    /// subtitle expires still draws it.
    pub fn tick(&mut self) -> Option<&str> {
        if !self.visible {
            return None;
        }

        if self.count > SUBTITLE_LIFETIME_FRAMES {
            self.visible = false;
        }

        let draw = self.count > SUBTITLE_SUPPRESS_FRAMES;
        self.count += 1;
        draw.then_some(self.text.as_str())
    }

    /// Draw position for a `draw_width`×`draw_height` output
    pub fn position(draw_width: u32, draw_height: u32) -> (i32, i32) {
        let w = draw_width as f64;
        let x = (w - w * 0.97) as i32;
        let y = (draw_height as f64 * 0.92) as i32;
        (x, y)
    }
}
