//! Shifting a whole grid by a cell offset

use blockmap_core::GridBuffer;
use serde::{Deserialize, Serialize};

/// What happens at the grid edges when contents are shifted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftEdge {
    /// Cells pushed past an edge are dropped; vacated cells keep their old value
    #[default]
    Keep,
    /// Cells pushed past an edge re-enter from the opposite edge
    Wrap,
}

/// Translate every cell by (dx, dy). Returns whether any cell changed.
pub fn shift(grid: &mut GridBuffer, dx: i32, dy: i32, edge: ShiftEdge) -> bool {
    if grid.is_empty() {
        return false;
    }

    let source = grid.clone();
    let (width, height) = (source.width() as i32, source.height() as i32);

    // Offsets are reduced to less than one grid size so the sums below stay in range
    let (dx, dy) = match edge {
        ShiftEdge::Keep => {
            if dx.unsigned_abs() >= source.width() || dy.unsigned_abs() >= source.height() {
                return false;
            }
            (dx, dy)
        }
        ShiftEdge::Wrap => (dx.rem_euclid(width), dy.rem_euclid(height)),
    };
    if dx == 0 && dy == 0 {
        return false;
    }

    for y in 0..height {
        for x in 0..width {
            let (mut to_x, mut to_y) = (x + dx, y + dy);
            match edge {
                ShiftEdge::Keep => {
                    if !grid.contains(to_x, to_y) {
                        continue;
                    }
                }
                ShiftEdge::Wrap => {
                    to_x %= width;
                    to_y %= height;
                }
            }
            if let Some(block) = source.block(x, y) {
                grid.set_block(to_x, to_y, block);
            }
        }
    }

    *grid != source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> GridBuffer {
        let ids = (1..=(width * height) as u16).collect();
        GridBuffer::from_metatiles(width, height, ids).unwrap()
    }

    #[test]
    fn test_shift_right_keeps_vacated_column() {
        let mut grid = numbered(3, 3);
        assert!(shift(&mut grid, 1, 0, ShiftEdge::Keep));
        assert_eq!(grid.metatiles(), &[1, 1, 2, 4, 4, 5, 7, 7, 8]);
    }

    #[test]
    fn test_shift_up_left() {
        let mut grid = numbered(3, 3);
        assert!(shift(&mut grid, -1, -1, ShiftEdge::Keep));
        assert_eq!(grid.metatiles(), &[5, 6, 3, 8, 9, 6, 7, 8, 9]);
    }

    #[test]
    fn test_shift_wraps() {
        let mut grid = numbered(3, 3);
        assert!(shift(&mut grid, 1, 0, ShiftEdge::Wrap));
        assert_eq!(grid.metatiles(), &[3, 1, 2, 6, 4, 5, 9, 7, 8]);

        let mut grid = numbered(3, 2);
        assert!(shift(&mut grid, -4, 3, ShiftEdge::Wrap));
        assert_eq!(grid.metatiles(), &[5, 6, 4, 2, 3, 1]);
    }

    #[test]
    fn test_shift_noops() {
        let mut grid = numbered(3, 3);
        assert!(!shift(&mut grid, 0, 0, ShiftEdge::Keep));
        assert!(!shift(&mut grid, 3, 0, ShiftEdge::Keep));
        assert!(!shift(&mut grid, 3, -3, ShiftEdge::Wrap));
        assert_eq!(grid, numbered(3, 3));
    }

    #[test]
    fn test_shift_extreme_offsets() {
        let mut grid = numbered(3, 3);
        assert!(!shift(&mut grid, i32::MAX, 0, ShiftEdge::Keep));
        assert!(!shift(&mut grid, 0, i32::MIN, ShiftEdge::Keep));
        assert_eq!(grid, numbered(3, 3));

        // i32::MAX = 3 * 715827882 + 1
        assert!(shift(&mut grid, i32::MAX, 0, ShiftEdge::Wrap));
        assert_eq!(grid.metatiles(), &[3, 1, 2, 6, 4, 5, 9, 7, 8]);

        // i32::MIN leaves a remainder of 1 as well
        let mut grid = numbered(3, 3);
        assert!(shift(&mut grid, 0, i32::MIN, ShiftEdge::Wrap));
        assert_eq!(grid.metatiles(), &[7, 8, 9, 1, 2, 3, 4, 5, 6]);
    }
}
