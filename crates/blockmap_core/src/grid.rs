//! Grid buffers (blockdata) and immutable snapshots of them

use crate::block::{Block, BlockAttributes, MetatileId, INVALID_METATILE};
use serde::{Deserialize, Serialize};

/// Errors raised by grid operations that indicate a caller/integration bug
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Two buffers were expected to have the same number of cells
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// Cell data does not cover `width * height` cells
    DataLength { width: u32, height: u32, len: usize },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::DimensionMismatch { expected, found } => write!(
                f,
                "Dimension mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            GridError::DataLength { width, height, len } => write!(
                f,
                "Grid of {}x{} needs {} cells, got {}",
                width,
                height,
                *width as usize * *height as usize,
                len
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Serialized form of a grid; validated on the way back in
#[derive(Serialize, Deserialize)]
struct GridData {
    width: u32,
    height: u32,
    metatiles: Vec<MetatileId>,
    attributes: Vec<BlockAttributes>,
}

/// A flat, row-major 2D array of blocks.
///
/// Metatile ids and collision attributes live in two parallel buffers,
/// both exactly `width * height` long. Reads outside the grid return
/// [`INVALID_METATILE`] (or `None`) and writes outside it are ignored, so
/// paint tools can probe neighbors at the edges without checking first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct GridBuffer {
    width: u32,
    height: u32,
    metatiles: Vec<MetatileId>,
    attributes: Vec<BlockAttributes>,
}

impl TryFrom<GridData> for GridBuffer {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let size = data.width as usize * data.height as usize;
        if data.metatiles.len() != size || data.attributes.len() != size {
            return Err(GridError::DataLength {
                width: data.width,
                height: data.height,
                len: data.metatiles.len().min(data.attributes.len()),
            });
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            metatiles: data.metatiles,
            attributes: data.attributes,
        })
    }
}

impl From<GridBuffer> for GridData {
    fn from(grid: GridBuffer) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            metatiles: grid.metatiles,
            attributes: grid.attributes,
        }
    }
}

impl GridBuffer {
    /// Create a grid where every cell is the default block (metatile 0)
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Block::default())
    }

    /// Create a grid where every cell is `block`
    pub fn filled(width: u32, height: u32, block: Block) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            metatiles: vec![block.metatile_id; size],
            attributes: vec![block.attributes; size],
        }
    }

    /// Build a grid from metatile ids, with default attributes
    pub fn from_metatiles(
        width: u32,
        height: u32,
        metatiles: Vec<MetatileId>,
    ) -> Result<Self, GridError> {
        let size = width as usize * height as usize;
        if metatiles.len() != size {
            return Err(GridError::DataLength {
                width,
                height,
                len: metatiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            metatiles,
            attributes: vec![BlockAttributes::default(); size],
        })
    }

    /// Build a grid from raw packed blockdata words
    pub fn from_raw(width: u32, height: u32, raw: &[u16]) -> Result<Self, GridError> {
        let size = width as usize * height as usize;
        if raw.len() != size {
            return Err(GridError::DataLength {
                width,
                height,
                len: raw.len(),
            });
        }
        let mut grid = Self::new(width, height);
        for (index, word) in raw.iter().enumerate() {
            let block = Block::from_raw(*word);
            grid.metatiles[index] = block.metatile_id;
            grid.attributes[index] = block.attributes;
        }
        Ok(grid)
    }

    /// Pack every cell into raw blockdata words (row-major)
    pub fn to_raw(&self) -> Vec<u16> {
        self.metatiles
            .iter()
            .zip(&self.attributes)
            .map(|(id, attributes)| {
                Block {
                    metatile_id: *id,
                    attributes: *attributes,
                }
                .to_raw()
            })
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.metatiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metatiles.is_empty()
    }

    /// Check whether a position lies inside the grid
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Linear index of a position, if inside the grid
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Metatile id at a position, or [`INVALID_METATILE`] outside the grid
    pub fn get(&self, x: i32, y: i32) -> MetatileId {
        self.try_get(x, y).unwrap_or(INVALID_METATILE)
    }

    /// Metatile id at a position
    pub fn try_get(&self, x: i32, y: i32) -> Option<MetatileId> {
        self.index_of(x, y).map(|index| self.metatiles[index])
    }

    /// Collision attributes at a position
    pub fn attributes_at(&self, x: i32, y: i32) -> Option<BlockAttributes> {
        self.index_of(x, y).map(|index| self.attributes[index])
    }

    /// Full block at a position
    pub fn block(&self, x: i32, y: i32) -> Option<Block> {
        self.index_of(x, y).map(|index| self.block_at(index))
    }

    /// Full block at a linear index.
    ///
    /// Panics if `index >= self.len()`.
    pub fn block_at(&self, index: usize) -> Block {
        Block {
            metatile_id: self.metatiles[index],
            attributes: self.attributes[index],
        }
    }

    /// Set the metatile id at a position (ignored outside the grid)
    pub fn set(&mut self, x: i32, y: i32, metatile_id: MetatileId) {
        if let Some(index) = self.index_of(x, y) {
            self.metatiles[index] = metatile_id;
        }
    }

    /// Set the collision attributes at a position (ignored outside the grid)
    pub fn set_attributes(&mut self, x: i32, y: i32, attributes: BlockAttributes) {
        if let Some(index) = self.index_of(x, y) {
            self.attributes[index] = attributes;
        }
    }

    /// Set a whole block at a position (ignored outside the grid)
    pub fn set_block(&mut self, x: i32, y: i32, block: Block) {
        if let Some(index) = self.index_of(x, y) {
            self.metatiles[index] = block.metatile_id;
            self.attributes[index] = block.attributes;
        }
    }

    /// All metatile ids, row-major
    pub fn metatiles(&self) -> &[MetatileId] {
        &self.metatiles
    }

    /// All collision attributes, row-major
    pub fn attributes(&self) -> &[BlockAttributes] {
        &self.attributes
    }

    /// Reallocate to new dimensions.
    ///
    /// Existing content is placed with its top-left corner at `offset` in
    /// the new grid; cells it does not cover are set to `fill`. Content
    /// that falls outside the new bounds is dropped.
    pub fn resize(&mut self, new_width: u32, new_height: u32, offset: (i32, i32), fill: Block) {
        let mut resized = Self::filled(new_width, new_height, fill);
        for y in 0..new_height as i32 {
            for x in 0..new_width as i32 {
                if let Some(block) = self.block(x - offset.0, y - offset.1) {
                    resized.set_block(x, y, block);
                }
            }
        }
        *self = resized;
    }

    /// Copy all cells from `other`.
    ///
    /// Both buffers must hold the same number of cells; otherwise nothing
    /// is copied and a [`GridError::DimensionMismatch`] is returned.
    pub fn copy_from(&mut self, other: &GridBuffer) -> Result<(), GridError> {
        if self.len() != other.len() {
            return Err(GridError::DimensionMismatch {
                expected: self.dimensions(),
                found: other.dimensions(),
            });
        }
        self.width = other.width;
        self.height = other.height;
        self.metatiles.copy_from_slice(&other.metatiles);
        self.attributes.copy_from_slice(&other.attributes);
        Ok(())
    }

    /// Take a deep copy of the current contents
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { grid: self.clone() }
    }

    /// Replace the contents and dimensions wholesale with a snapshot
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.clone_from(&snapshot.grid);
    }
}

/// An immutable copy of a grid at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: GridBuffer,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.grid.dimensions()
    }

    /// Read-only view of the captured grid
    pub fn grid(&self) -> &GridBuffer {
        &self.grid
    }

    pub fn same_dimensions(&self, other: &Snapshot) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Linear indices of every cell that differs between two snapshots
    pub fn diff(&self, other: &Snapshot) -> Result<Vec<usize>, GridError> {
        if !self.same_dimensions(other) {
            return Err(GridError::DimensionMismatch {
                expected: self.dimensions(),
                found: other.dimensions(),
            });
        }
        Ok((0..self.grid.len())
            .filter(|&index| self.grid.block_at(index) != other.grid.block_at(index))
            .collect())
    }
}

impl From<GridBuffer> for Snapshot {
    fn from(grid: GridBuffer) -> Self {
        Self { grid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> GridBuffer {
        let ids = (0..(width * height) as u16).collect();
        GridBuffer::from_metatiles(width, height, ids).unwrap()
    }

    #[test]
    fn test_new_grid() {
        let grid = GridBuffer::new(4, 3);
        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.attributes().len(), 12);
        assert!(grid.metatiles().iter().all(|&id| id == 0));
    }

    #[test]
    fn test_get_set_and_bounds() {
        let mut grid = GridBuffer::new(3, 3);
        grid.set(1, 2, 42);
        assert_eq!(grid.get(1, 2), 42);
        assert_eq!(grid.metatiles()[2 * 3 + 1], 42);

        // Out of range reads return the sentinel, writes are ignored
        assert_eq!(grid.get(-1, 0), INVALID_METATILE);
        assert_eq!(grid.get(3, 0), INVALID_METATILE);
        assert_eq!(grid.try_get(0, 3), None);
        let before = grid.clone();
        grid.set(-1, -1, 9);
        grid.set(3, 1, 9);
        grid.set_block(0, 5, Block::new(9));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_from_metatiles_length_check() {
        let result = GridBuffer::from_metatiles(2, 2, vec![1, 2, 3]);
        assert_eq!(
            result,
            Err(GridError::DataLength {
                width: 2,
                height: 2,
                len: 3
            })
        );
    }

    #[test]
    fn test_resize_preserves_origin() {
        let mut grid = numbered(3, 2);
        grid.resize(4, 3, (0, 0), Block::new(99));

        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(2, 1), 5);
        assert_eq!(grid.get(3, 0), 99);
        assert_eq!(grid.get(0, 2), 99);

        grid.resize(2, 1, (0, 0), Block::new(99));
        assert_eq!(grid.metatiles(), &[0, 1]);
    }

    #[test]
    fn test_resize_with_offset() {
        let mut grid = numbered(2, 2);
        grid.resize(3, 3, (1, 1), Block::new(7));
        assert_eq!(grid.metatiles(), &[7, 7, 7, 7, 0, 1, 7, 2, 3]);
    }

    #[test]
    fn test_copy_from_requires_matching_length() {
        let mut grid = GridBuffer::new(2, 2);
        let source = numbered(2, 2);
        grid.copy_from(&source).unwrap();
        assert_eq!(grid, source);

        let before = grid.clone();
        let result = grid.copy_from(&GridBuffer::new(3, 2));
        assert_eq!(
            result,
            Err(GridError::DimensionMismatch {
                expected: (2, 2),
                found: (3, 2)
            })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut grid = numbered(2, 2);
        let snapshot = grid.snapshot();
        grid.set(0, 0, 50);

        assert_eq!(snapshot.grid().get(0, 0), 0);
        grid.restore(&snapshot);
        assert_eq!(grid.get(0, 0), 0);
    }

    #[test]
    fn test_snapshot_diff() {
        let mut grid = numbered(3, 3);
        let before = grid.snapshot();
        grid.set(1, 1, 100);
        grid.set_attributes(2, 2, BlockAttributes::new(1, 3));
        let after = grid.snapshot();

        assert_eq!(before.diff(&after), Ok(vec![4, 8]));
        assert!(before.diff(&GridBuffer::new(2, 2).snapshot()).is_err());
    }

    #[test]
    fn test_raw_round_trip() {
        let mut grid = numbered(4, 2);
        grid.set_attributes(3, 1, BlockAttributes::new(1, 4));
        let raw = grid.to_raw();

        let restored = GridBuffer::from_raw(4, 2, &raw).unwrap();
        assert_eq!(restored, grid);
        assert_eq!(restored.to_raw(), raw);
    }

    #[test]
    fn test_serde_rejects_bad_length() {
        let json = r#"{"width":2,"height":2,"metatiles":[1,2],"attributes":[]}"#;
        assert!(serde_json::from_str::<GridBuffer>(json).is_err());

        let grid = numbered(2, 2);
        let json = serde_json::to_string(&grid).unwrap();
        let back: GridBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
