//! Pixel-art enemy sprites
//!
//! Each enemy kind has two marching frames stored as one `u16` per row,
//! right-aligned, most significant used bit = leftmost pixel.

use crate::sim::{EnemyKind, Rect};

/// A 1-bit sprite
#[derive(Debug, Clone, Copy)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rows: &'static [u16],
}

impl Bitmap {
    /// Pixel at (col, row); out of range reads as empty
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        if col >= self.width {
            return false;
        }
        self.rows
            .get(row as usize)
            .is_some_and(|bits| bits >> (self.width - 1 - col) & 1 == 1)
    }

    /// Filled rectangles covering the sprite scaled into `target`.
    /// Horizontal runs of pixels merge into one rectangle.
    pub fn runs(&self, target: Rect) -> Vec<Rect> {
        let cell_w = target.size.x / self.width as f32;
        let cell_h = target.size.y / self.height as f32;
        let mut out = Vec::new();
        for row in 0..self.height {
            let y = target.pos.y + row as f32 * cell_h;
            let mut col = 0;
            while col < self.width {
                if !self.is_set(col, row) {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < self.width && self.is_set(col, row) {
                    col += 1;
                }
                out.push(Rect::new(
                    target.pos.x + start as f32 * cell_w,
                    y,
                    (col - start) as f32 * cell_w,
                    cell_h,
                ));
            }
        }
        out
    }
}

/*
 *    OO
 *   OOOO
 *  OOOOOO
 * OO OO OO
 * OOOOOOOO
 *   O  O
 *  O OO O
 * O O  O O
 */
const SQUID: [Bitmap; 2] = [
    Bitmap {
        width: 8,
        height: 8,
        rows: &[
            0b00011000, 0b00111100, 0b01111110, 0b11011011, 0b11111111, 0b00100100, 0b01011010,
            0b10100101,
        ],
    },
    Bitmap {
        width: 8,
        height: 8,
        rows: &[
            0b00011000, 0b00111100, 0b01111110, 0b11011011, 0b11111111, 0b01011010, 0b10000001,
            0b01000010,
        ],
    },
];

/*
 *   O     O
 *    O   O
 *   OOOOOOO
 *  OO OOO OO
 * OOOOOOOOOOO
 * O OOOOOOO O
 * O O     O O
 *    OO OO
 */
const CRAB: [Bitmap; 2] = [
    Bitmap {
        width: 11,
        height: 8,
        rows: &[
            0b00100000100,
            0b00010001000,
            0b00111111100,
            0b01101110110,
            0b11111111111,
            0b10111111101,
            0b10100000101,
            0b00011011000,
        ],
    },
    Bitmap {
        width: 11,
        height: 8,
        rows: &[
            0b00100000100,
            0b10010001001,
            0b10111111101,
            0b11101110111,
            0b11111111111,
            0b01111111110,
            0b00100000100,
            0b01000000010,
        ],
    },
];

/*
 *     OOOO
 *  OOOOOOOOOO
 * OOOOOOOOOOOO
 * OOO  OO  OOO
 * OOOOOOOOOOOO
 *    OO  OO
 *   OO OO OO
 * OO        OO
 */
const OCTOPUS: [Bitmap; 2] = [
    Bitmap {
        width: 12,
        height: 8,
        rows: &[
            0b000011110000,
            0b011111111110,
            0b111111111111,
            0b111001100111,
            0b111111111111,
            0b000110011000,
            0b001101101100,
            0b110000000011,
        ],
    },
    Bitmap {
        width: 12,
        height: 8,
        rows: &[
            0b000011110000,
            0b011111111110,
            0b111111111111,
            0b111001100111,
            0b111111111111,
            0b001110011100,
            0b011001100110,
            0b001100001100,
        ],
    },
];

/// Sprite for an enemy kind at a marching frame (any integer, wraps)
pub fn enemy_bitmap(kind: EnemyKind, frame: u64) -> &'static Bitmap {
    let frames = match kind {
        EnemyKind::Squid => &SQUID,
        EnemyKind::Crab => &CRAB,
        EnemyKind::Octopus => &OCTOPUS,
    };
    &frames[(frame % 2) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_fit_declared_width() {
        for kind in [EnemyKind::Squid, EnemyKind::Crab, EnemyKind::Octopus] {
            for frame in 0..2 {
                let bm = enemy_bitmap(kind, frame);
                assert_eq!(bm.rows.len() as u32, bm.height);
                for &row in bm.rows {
                    assert!(row < (1 << bm.width), "{kind:?} row too wide");
                }
            }
        }
    }

    #[test]
    fn test_runs_merge_horizontally() {
        let bm = enemy_bitmap(EnemyKind::Squid, 0);
        let runs = bm.runs(Rect::new(0.0, 0.0, 8.0, 8.0));
        // Row 0 "   OO   " is a single 2-pixel run
        assert_eq!(runs[0], Rect::new(3.0, 0.0, 2.0, 1.0));
        // Row 4 is solid
        assert!(runs.contains(&Rect::new(0.0, 4.0, 8.0, 1.0)));
        // Runs stay inside the target
        for r in &runs {
            assert!(r.left() >= 0.0 && r.right() <= 8.0);
            assert!(r.top() >= 0.0 && r.bottom() <= 8.0);
        }
    }

    #[test]
    fn test_out_of_range_pixel_is_empty() {
        let bm = enemy_bitmap(EnemyKind::Crab, 0);
        assert!(!bm.is_set(bm.width, 0));
        assert!(!bm.is_set(0, bm.height));
    }
}
