//! Normal (rectangular brush) painting

use super::offset;
use blockmap_core::{GridBuffer, SelectionPattern};

/// Stamp `pattern` with its top-left corner at (x, y), clipped to the grid.
///
/// Disabled pattern items leave their cell untouched. Returns whether any
/// cell changed.
pub fn paint(grid: &mut GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> bool {
    let (width, height) = pattern.dimensions();
    let mut changed = false;

    for j in 0..height as i32 {
        for i in 0..width as i32 {
            let Some((px, py)) = offset(x, y, i, j) else {
                continue;
            };
            let Some(block) = grid.block(px, py) else {
                continue;
            };
            let index = j as usize * width as usize + i as usize;
            if let Some(stamped) = pattern.stamp(index, block) {
                if stamped != block {
                    grid.set_block(px, py, stamped);
                    changed = true;
                }
            }
        }
    }

    changed
}

/// Snap a drag position onto the brush lattice anchored at the stroke origin.
///
/// Dragging a 2x2 brush from (5, 5) paints at (5, 5), (7, 5), (3, 5) and so
/// on, so a stroke tiles the pattern instead of overlapping it. Positions
/// whose lattice point falls outside the `i32` range are returned unsnapped.
pub fn snap_to_pattern(
    origin: (i32, i32),
    pos: (i32, i32),
    dimensions: (u32, u32),
) -> (i32, i32) {
    (
        snap_axis(origin.0, pos.0, dimensions.0).unwrap_or(pos.0),
        snap_axis(origin.1, pos.1, dimensions.1).unwrap_or(pos.1),
    )
}

fn snap_axis(origin: i32, pos: i32, size: u32) -> Option<i32> {
    let size = i64::from(size.max(1));
    let (origin, pos) = (i64::from(origin), i64::from(pos));
    i32::try_from(origin + (pos - origin).div_euclid(size) * size).ok()
}
