//! Editor tools - paint, fill, smart path, shift and resize
//!
//! Every tool is a plain function over a [`GridBuffer`]. Tools never touch
//! history or rendering; the session runs them on a working copy and wraps
//! the result in an edit command.

mod fill;
mod paint;
mod resize;
mod shift;
mod smart_path;

pub use fill::{flood_fill, magic_fill};
pub use paint::{paint, snap_to_pattern};
pub use resize::resized;
pub use shift::{shift, ShiftEdge};
pub use smart_path::{
    flood_fill_smart_path, is_smart_path_pattern, neighbor_mask, paint_smart_path,
    smart_path_variant, SMART_PATH_TABLE,
};

use blockmap_core::GridBuffer;
use std::collections::VecDeque;

/// Up, right, down, left
pub(crate) const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// (x + dx, y + dy), or `None` when the sum leaves the `i32` range
#[inline]
pub(crate) fn offset(x: i32, y: i32, dx: i32, dy: i32) -> Option<(i32, i32)> {
    Some((x.checked_add(dx)?, y.checked_add(dy)?))
}

/// Every cell 4-connected to the seed that shares the seed's metatile id,
/// in breadth-first order starting with the seed.
///
/// Returns an empty list when the seed lies outside the grid.
pub fn connected_region(grid: &GridBuffer, x: i32, y: i32) -> Vec<(i32, i32)> {
    let Some(seed_index) = grid.index_of(x, y) else {
        return Vec::new();
    };
    let seed_id = grid.metatiles()[seed_index];

    let mut visited = vec![false; grid.len()];
    visited[seed_index] = true;
    let mut queue = VecDeque::from([(x, y)]);
    let mut region = Vec::new();

    while let Some((cx, cy)) = queue.pop_front() {
        region.push((cx, cy));
        for (dx, dy) in CARDINALS {
            let (nx, ny) = (cx + dx, cy + dy);
            let Some(index) = grid.index_of(nx, ny) else {
                continue;
            };
            if !visited[index] && grid.metatiles()[index] == seed_id {
                visited[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    region
}
