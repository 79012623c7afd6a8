//! Bucket (flood) fill and magic fill

use super::connected_region;
use blockmap_core::{GridBuffer, SelectionPattern};

/// Flood fill the 4-connected region sharing the seed's metatile id.
///
/// Each cell of the region receives the pattern item at its offset from the
/// seed, so a larger brush is tiled across the region and clipped at its
/// edges. Cells outside the region are never touched.
pub fn flood_fill(grid: &mut GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> bool {
    let Some(seed_id) = grid.try_get(x, y) else {
        return false;
    };
    if pattern.is_single() && pattern.anchor().metatile_id == seed_id {
        return false;
    }

    let mut changed = false;
    for (cx, cy) in connected_region(grid, x, y) {
        changed |= stamp_tiled(grid, cx, cy, x, y, pattern);
    }
    changed
}

/// Replace every cell in the grid sharing the seed's metatile id, connected
/// or not, tiling the pattern from the seed.
pub fn magic_fill(grid: &mut GridBuffer, x: i32, y: i32, pattern: &SelectionPattern) -> bool {
    let Some(seed_id) = grid.try_get(x, y) else {
        return false;
    };
    if pattern.is_single() && pattern.anchor().metatile_id == seed_id {
        return false;
    }

    let mut changed = false;
    for cy in 0..grid.height() as i32 {
        for cx in 0..grid.width() as i32 {
            if grid.get(cx, cy) == seed_id {
                changed |= stamp_tiled(grid, cx, cy, x, y, pattern);
            }
        }
    }
    changed
}

fn stamp_tiled(
    grid: &mut GridBuffer,
    x: i32,
    y: i32,
    origin_x: i32,
    origin_y: i32,
    pattern: &SelectionPattern,
) -> bool {
    let Some(block) = grid.block(x, y) else {
        return false;
    };
    let index = pattern.tiled_index(x - origin_x, y - origin_y);
    match pattern.stamp(index, block) {
        Some(stamped) if stamped != block => {
            grid.set_block(x, y, stamped);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockmap_core::Block;

    fn count(grid: &GridBuffer, id: u16) -> usize {
        grid.metatiles().iter().filter(|&&m| m == id).count()
    }

    #[test]
    fn test_flood_fill_uniform_grid() {
        let mut grid = GridBuffer::filled(4, 4, Block::new(1));
        assert!(flood_fill(&mut grid, 0, 0, &SelectionPattern::single(2)));
        assert_eq!(count(&grid, 2), 16);
    }

    #[test]
    fn test_flood_fill_stays_inside_region() {
        #[rustfmt::skip]
        let mut grid = GridBuffer::from_metatiles(5, 3, vec![
            1, 1, 3, 1, 1,
            1, 1, 3, 1, 1,
            3, 3, 3, 1, 1,
        ])
        .unwrap();

        assert!(flood_fill(&mut grid, 0, 0, &SelectionPattern::single(7)));
        assert_eq!(grid.metatiles(), &[
            7, 7, 3, 1, 1,
            7, 7, 3, 1, 1,
            3, 3, 3, 1, 1,
        ]);
    }

    #[test]
    fn test_flood_fill_same_tile_is_noop() {
        let mut grid = GridBuffer::filled(3, 3, Block::new(4));
        assert!(!flood_fill(&mut grid, 1, 1, &SelectionPattern::single(4)));
        assert!(!flood_fill(&mut grid, 3, 0, &SelectionPattern::single(5)));
    }

    #[test]
    fn test_flood_fill_tiles_pattern_from_seed() {
        let mut grid = GridBuffer::filled(4, 2, Block::new(0));
        let pattern = SelectionPattern::new(2, 1, &[8, 9]).unwrap();

        assert!(flood_fill(&mut grid, 1, 0, &pattern));
        assert_eq!(grid.metatiles(), &[9, 8, 9, 8, 9, 8, 9, 8]);
    }

    #[test]
    fn test_magic_fill_replaces_disconnected_cells() {
        let mut grid = GridBuffer::filled(4, 4, Block::new(1));
        grid.set(3, 3, 9);

        assert!(magic_fill(&mut grid, 0, 0, &SelectionPattern::single(5)));
        assert_eq!(count(&grid, 5), 15);
        assert_eq!(grid.get(3, 3), 9);
    }

    #[test]
    fn test_magic_fill_across_walls() {
        #[rustfmt::skip]
        let mut grid = GridBuffer::from_metatiles(3, 3, vec![
            1, 2, 1,
            2, 2, 2,
            1, 2, 1,
        ])
        .unwrap();

        assert!(magic_fill(&mut grid, 0, 0, &SelectionPattern::single(6)));
        assert_eq!(count(&grid, 6), 4);
        assert_eq!(count(&grid, 1), 0);
        assert_eq!(count(&grid, 2), 5);
    }
}
