//! Layouts: the owners of a map's blockdata and border grids

use crate::grid::GridBuffer;
use crate::tileset::TilesetPair;
use crate::Block;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Stable identity of a layout, handed out to renderers and commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayoutId(pub Uuid);

impl LayoutId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LayoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of a layout's grids an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridTarget {
    /// The main map area
    Blockdata,
    /// The repeating border drawn around the map
    Border,
}

/// Non-owning handle to one grid of one layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRef {
    pub layout: LayoutId,
    pub target: GridTarget,
}

impl GridRef {
    pub fn blockdata(layout: LayoutId) -> Self {
        Self {
            layout,
            target: GridTarget::Blockdata,
        }
    }

    pub fn border(layout: LayoutId) -> Self {
        Self {
            layout,
            target: GridTarget::Border,
        }
    }
}

/// Rejected layout dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Width or height of zero
    EmptyDimensions { width: u32, height: u32 },
    /// Map data would exceed the configured maximum
    MapTooLarge { width: u32, height: u32, size: u64, max: u64 },
    BorderTooLarge { width: u32, height: u32, max: u32 },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::EmptyDimensions { width, height } => {
                write!(f, "Layout dimensions must be non-zero, got {}x{}", width, height)
            }
            LayoutError::MapTooLarge {
                width,
                height,
                size,
                max,
            } => write!(
                f,
                "A {}x{} map needs {} map data, the maximum is {}",
                width, height, size, max
            ),
            LayoutError::BorderTooLarge { width, height, max } => write!(
                f,
                "Border of {}x{} exceeds the maximum of {} per side",
                width, height, max
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// A map layout: blockdata, border and the tilesets both draw from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: LayoutId,
    pub name: String,
    pub blockdata: GridBuffer,
    pub border: GridBuffer,
    #[serde(default)]
    pub tilesets: TilesetPair,
}

impl Layout {
    /// Create a layout with every cell of both grids set to `fill`
    pub fn new(
        name: String,
        width: u32,
        height: u32,
        border_width: u32,
        border_height: u32,
        fill: Block,
        tilesets: TilesetPair,
    ) -> Self {
        Self {
            id: LayoutId::new(),
            name,
            blockdata: GridBuffer::filled(width, height, fill),
            border: GridBuffer::filled(border_width, border_height, fill),
            tilesets,
        }
    }

    pub fn width(&self) -> u32 {
        self.blockdata.width()
    }

    pub fn height(&self) -> u32 {
        self.blockdata.height()
    }

    pub fn border_width(&self) -> u32 {
        self.border.width()
    }

    pub fn border_height(&self) -> u32 {
        self.border.height()
    }

    /// Handle for one of this layout's grids
    pub fn grid_ref(&self, target: GridTarget) -> GridRef {
        GridRef {
            layout: self.id,
            target,
        }
    }

    pub fn grid(&self, target: GridTarget) -> &GridBuffer {
        match target {
            GridTarget::Blockdata => &self.blockdata,
            GridTarget::Border => &self.border,
        }
    }

    pub fn grid_mut(&mut self, target: GridTarget) -> &mut GridBuffer {
        match target {
            GridTarget::Blockdata => &mut self.blockdata,
            GridTarget::Border => &mut self.border,
        }
    }
}

/// All open layouts, keyed by id.
///
/// Edit commands refer to layouts through this store, so a layout that
/// has been removed simply stops receiving edits.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct Layouts {
    layouts: HashMap<LayoutId, Layout>,
}

impl Layouts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layout, replacing any existing layout with the same id
    pub fn insert(&mut self, layout: Layout) -> LayoutId {
        let id = layout.id;
        self.layouts.insert(id, layout);
        id
    }

    pub fn remove(&mut self, id: LayoutId) -> Option<Layout> {
        self.layouts.remove(&id)
    }

    pub fn get(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(&id)
    }

    pub fn get_mut(&mut self, id: LayoutId) -> Option<&mut Layout> {
        self.layouts.get_mut(&id)
    }

    /// Look up a single grid
    pub fn grid(&self, grid: GridRef) -> Option<&GridBuffer> {
        self.get(grid.layout).map(|layout| layout.grid(grid.target))
    }

    pub fn grid_mut(&mut self, grid: GridRef) -> Option<&mut GridBuffer> {
        self.get_mut(grid.layout)
            .map(|layout| layout.grid_mut(grid.target))
    }

    pub fn contains(&self, id: LayoutId) -> bool {
        self.layouts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.values()
    }
}
