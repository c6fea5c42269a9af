// Vendor text - On-screen text protocol of the LDP-1450 player
//
// The player shows up to 10 fixed rows of 11 characters. Games address a
// row by its Y coordinate; three rows answer to two coordinates each.
// Lines can be drawn two ways: kept in a table and drawn with the fixed
// font every frame, or mapped through the player's character-map bitmap
// straight into the LED buffer.

/// Visible characters per line
pub const LINE_LENGTH: usize = 11;

/// Number of protocol rows
pub const ROW_COUNT: usize = 10;

/// Y coordinate of each row
pub const ROW_Y: [i32; ROW_COUNT] = [69, 85, 101, 104, 120, 128, 136, 168, 184, 200];

/// Glyph index of the blank character in the character map
pub const BLANK_GLYPH: u8 = 0x31;

/// Glyph index drawn for the underscore control code
pub const UNDERSCORE_GLYPH: u8 = 0x32;

/// Control code the player shows as an underscore
pub const UNDERSCORE_CODE: u8 = 0x13;

// Row holding the rank display
const RANK_ROW: usize = 3;

// Leading characters inspected when counting a rank's visible characters
const RANK_SCAN_LENGTH: usize = 8;

/// Map a character code to its glyph in the character-map bitmap
///
/// # Arguments
/// * `code` - Character code sent by the game
///
/// # Returns
/// Glyph index (column in the character map)
pub fn glyph_index(code: u8) -> u8 {
    match code {
        0x26..=0x39 => code - 0x25,
        0x41..=0x5A => code - 0x2A,
        UNDERSCORE_CODE => UNDERSCORE_GLYPH,
        _ => BLANK_GLYPH,
    }
}

/// Pad with spaces or truncate to exactly `LINE_LENGTH` characters
pub fn pad_line(text: &[u8]) -> [u8; LINE_LENGTH] {
    let mut line = [b' '; LINE_LENGTH];
    let n = text.len().min(LINE_LENGTH);
    line[..n].copy_from_slice(&text[..n]);
    line
}

/// Map a whole line to glyph indices
pub fn line_glyphs(text: &[u8]) -> [u8; LINE_LENGTH] {
    pad_line(text).map(glyph_index)
}

/// Row addressed by a Y coordinate; 103, 119 and 135 alias the row below
pub fn row_index(y: i32) -> Option<usize> {
    match y {
        103 => Some(3),
        119 => Some(4),
        135 => Some(6),
        _ => ROW_Y.iter().position(|&row_y| row_y == y),
    }
}

/// One protocol row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VendorRow {
    pub text: String,
    /// Draw X position
    pub x: f32,
    pub visible: bool,
}

/// What a line did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Stored in the given row
    Stored(usize),
    /// Y matched no row
    UnknownRow,
    /// Blank line counted towards a reset
    ResetPending,
    /// Second blank line: every row hidden, overlay disabled
    Reset,
    /// Blank line while the overlay is disabled
    Ignored,
}

/// Table of the 10 protocol rows
#[derive(Debug, Clone, Default)]
pub struct VendorTextTable {
    rows: [VendorRow; ROW_COUNT],
    enabled: bool,
    reset_count: u32,
    rank_cycle: u32,
    rank: Option<String>,
}

fn line_to_string(line: &[u8]) -> String {
    line.iter().map(|&b| b as char).collect()
}

impl VendorTextTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one line from the game
    ///
    /// An all-blank line is a reset request; anything else is stored.
    ///
    /// # Arguments
    /// * `text` - Raw line, padded or truncated to 11 characters
    /// * `x` - Draw X position for the row
    /// * `y` - Protocol Y coordinate selecting the row
    pub fn draw_line(&mut self, text: &[u8], x: f32, y: i32) -> LineOutcome {
        let line = pad_line(text);
        if line.iter().all(|&c| c == b' ') {
            self.request_reset()
        } else {
            self.insert(&line, x, y)
        }
    }

    fn request_reset(&mut self) -> LineOutcome {
        if !self.enabled {
            return LineOutcome::Ignored;
        }

        self.reset_count += 1;
        if self.reset_count > 1 {
            for row in &mut self.rows {
                row.visible = false;
            }
            self.enabled = false;
            self.reset_count = 0;
            LineOutcome::Reset
        } else {
            LineOutcome::ResetPending
        }
    }

    fn insert(&mut self, line: &[u8; LINE_LENGTH], x: f32, y: i32) -> LineOutcome {
        let outcome = match row_index(y) {
            Some(RANK_ROW) => {
                let cleaned = line.map(|c| if c == UNDERSCORE_CODE { b'_' } else { c });
                let text = self.rank_text(line_to_string(&cleaned), line);
                self.store(RANK_ROW, text, x)
            }
            Some(index) => {
                // Score rows end a rank sequence
                if index == 8 || index == 9 {
                    self.rank_cycle = 0;
                }
                self.store(index, line_to_string(line), x)
            }
            None => LineOutcome::UnknownRow,
        };

        self.reset_count = 0;
        self.enabled = true;
        outcome
    }

    // A three-character rank is cached on the second line of a sequence and
    // shown in place of the first and third.
    fn rank_text(&mut self, text: String, line: &[u8; LINE_LENGTH]) -> String {
        let shown = line[..RANK_SCAN_LENGTH]
            .iter()
            .filter(|&&c| c != b' ')
            .count();
        if shown != 3 {
            self.rank_cycle = 0;
            return text;
        }

        let text = if self.rank_cycle == 1 {
            self.rank = Some(text.clone());
            text
        } else {
            self.rank.clone().unwrap_or(text)
        };

        self.rank_cycle += 1;
        if self.rank_cycle > 2 {
            self.rank_cycle = 0;
        }
        text
    }

    fn store(&mut self, index: usize, text: String, x: f32) -> LineOutcome {
        self.rows[index] = VendorRow {
            text,
            x,
            visible: true,
        };
        LineOutcome::Stored(index)
    }

    /// Whether the overlay is shown
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn row(&self, index: usize) -> Option<&VendorRow> {
        self.rows.get(index)
    }

    /// Visible rows with their protocol Y coordinate
    pub fn visible_rows(&self) -> impl Iterator<Item = (i32, &VendorRow)> {
        ROW_Y
            .iter()
            .zip(self.rows.iter())
            .filter(|(_, row)| row.visible)
            .map(|(&y, row)| (y, row))
    }
}
