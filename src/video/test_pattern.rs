// Test pattern - Synthetic YV12 frames for running without a decoder

/// Y, U, V of the 75% colour bars, left to right
const BARS: [(u8, u8, u8); 7] = [
    (180, 128, 128), // white
    (162, 44, 142),  // yellow
    (131, 156, 44),  // cyan
    (112, 72, 58),   // green
    (84, 184, 198),  // magenta
    (65, 100, 212),  // red
    (35, 212, 114),  // blue
];

/// One YV12 frame with its planes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFrame {
    pub width: u32,
    pub height: u32,
    pub y: Vec<u8>,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
}

impl TestFrame {
    /// Colour bars shifted `offset` pixels to the left
    pub fn color_bars(width: u32, height: u32, offset: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        let (cw, ch) = (w / 2, h / 2);
        let bar_of = |x: usize| {
            let x = (x + offset as usize) % w.max(1);
            BARS[x * BARS.len() / w.max(1)]
        };

        let mut y = vec![0u8; w * h];
        for row in y.chunks_mut(w.max(1)) {
            for (x, px) in row.iter_mut().enumerate() {
                *px = bar_of(x).0;
            }
        }

        let mut u = vec![0u8; cw * ch];
        let mut v = vec![0u8; cw * ch];
        for row in 0..ch {
            for x in 0..cw {
                let (_, bu, bv) = bar_of(x * 2);
                u[row * cw + x] = bu;
                v[row * cw + x] = bv;
            }
        }

        Self {
            width,
            height,
            y,
            u,
            v,
        }
    }

    /// Row pitches of the three planes
    pub fn pitches(&self) -> (usize, usize, usize) {
        let w = self.width as usize;
        (w, w / 2, w / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_sizes() {
        let frame = TestFrame::color_bars(720, 480, 0);
        assert_eq!(frame.y.len(), 720 * 480);
        assert_eq!(frame.u.len(), 720 * 480 / 4);
        assert_eq!(frame.pitches(), (720, 360, 360));
    }

    #[test]
    fn test_first_and_last_bar() {
        let frame = TestFrame::color_bars(70, 2, 0);
        assert_eq!(frame.y[0], 180);
        assert_eq!(frame.y[69], 35);
    }

    #[test]
    fn test_offset_scrolls() {
        let frame = TestFrame::color_bars(70, 2, 10);
        assert_eq!(frame.y[0], 162);
    }
}
