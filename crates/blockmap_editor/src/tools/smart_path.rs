//! Smart path painting: auto-joining path tiles from a 3x3 brush
//!
//! The brush is read as a 3x3 path kit (corners, edges and an open centre).
//! Each path cell looks at its up/right/down/left neighbors and picks the
//! kit piece that joins them.

use super::{connected_region, offset, CARDINALS};
use blockmap_core::{GridBuffer, SelectionPattern};
use std::collections::VecDeque;

/// Brush item for every neighbor mask (up = 1, right = 2, down = 4, left = 8)
pub const SMART_PATH_TABLE: [usize; 16] = [
    4, // ----
    4, // U---
    4, // -R--
    6, // UR--
    4, // --D-
    4, // U-D-
    0, // -RD-
    3, // URD-
    4, // ---L
    8, // U--L
    4, // -R-L
    7, // UR-L
    2, // --DL
    5, // U-DL
    1, // -RDL
    4, // URDL
];

/// Index of the open (centre) piece in the brush
const OPEN_PIECE: usize = 4;

/// Whether a brush can be used for smart path painting
pub fn is_smart_path_pattern(pattern: &SelectionPattern) -> bool {
    pattern.dimensions() == (3, 3)
}

/// Brush item for a neighbor mask
#[inline]
pub fn smart_path_variant(mask: u8) -> usize {
    SMART_PATH_TABLE[usize::from(mask & 0x0F)]
}

/// Which cardinal neighbors of (x, y) are path tiles.
///
/// A neighbor counts when it is inside the grid and its metatile is one of
/// the brush's pieces.
pub fn neighbor_mask(grid: &GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> u8 {
    CARDINALS
        .iter()
        .enumerate()
        .filter(|(_, &(dx, dy))| {
            offset(x, y, dx, dy).is_some_and(|(nx, ny)| is_path_tile(grid, nx, ny, pattern))
        })
        .fold(0, |mask, (bit, _)| mask | (1u8 << bit))
}

/// Paint a 2x2 block of path at (x, y) and re-join the cells around it.
///
/// Returns false without touching the grid for non-3x3 brushes.
pub fn paint_smart_path(grid: &mut GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> bool {
    if !is_smart_path_pattern(pattern) {
        return false;
    }

    let mut changed = false;
    for j in 0..=1 {
        for i in 0..=1 {
            if let Some((px, py)) = offset(x, y, i, j) {
                changed |= stamp(grid, px, py, OPEN_PIECE, pattern);
            }
        }
    }

    // The outer corners of the 4x4 window can't border the painted block
    for j in -1..=2 {
        for i in -1..=2 {
            if (i == -1 || i == 2) && (j == -1 || j == 2) {
                continue;
            }
            if let Some((px, py)) = offset(x, y, i, j) {
                changed |= resolve(grid, px, py, pattern);
            }
        }
    }

    changed
}

/// Flood fill the seed's region with path, then re-join every path cell
/// reachable from the seed.
///
/// Returns false without touching the grid for non-3x3 brushes.
pub fn flood_fill_smart_path(
    grid: &mut GridBuffer,
    x: i32,
    y: i32,
    pattern: &SelectionPattern,
) -> bool {
    if !is_smart_path_pattern(pattern) || !grid.contains(x, y) {
        return false;
    }

    let mut changed = false;
    for (cx, cy) in connected_region(grid, x, y) {
        changed |= stamp(grid, cx, cy, OPEN_PIECE, pattern);
    }

    if !is_path_tile(grid, x, y, pattern) {
        // The open piece is disabled, so nothing was laid down
        return changed;
    }

    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::from([(x, y)]);
    if let Some(index) = grid.index_of(x, y) {
        visited[index] = true;
    }

    while let Some((cx, cy)) = queue.pop_front() {
        changed |= resolve(grid, cx, cy, pattern);
        for (dx, dy) in CARDINALS {
            let (nx, ny) = (cx + dx, cy + dy);
            let Some(index) = grid.index_of(nx, ny) else {
                continue;
            };
            if !visited[index] && is_path_tile(grid, nx, ny, pattern) {
                visited[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    changed
}

fn is_path_tile(grid: &GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> bool {
    grid.try_get(x, y)
        .is_some_and(|id| pattern.contains_metatile(id))
}

/// Swap a path cell for the piece matching its neighbors
fn resolve(grid: &mut GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> bool {
    if !is_path_tile(grid, x, y, pattern) {
        return false;
    }
    let piece = smart_path_variant(neighbor_mask(grid, x, y, pattern));
    stamp(grid, x, y, piece, pattern)
}

fn stamp(grid: &mut GridBuffer, x: i32, y: i32, piece: usize, pattern: &SelectionPattern) -> bool {
    let Some(block) = grid.block(x, y) else {
        return false;
    };
    match pattern.stamp(piece, block) {
        Some(stamped) if stamped != block => {
            grid.set_block(x, y, stamped);
            true
        }
        _ => false,
    }
}
