//! Resizing a grid anchored at its top-left corner

use blockmap_core::{Block, GridBuffer};

/// A copy of `grid` at the new dimensions.
///
/// Existing cells stay anchored at the origin, new rows and columns are set
/// to `fill` and shrinking drops the cells past the new edges.
pub fn resized(grid: &GridBuffer, width: u32, height: u32, fill: Block) -> GridBuffer {
    let mut resized = grid.clone();
    resized.resize(width, height, (0, 0), fill);
    resized
}
