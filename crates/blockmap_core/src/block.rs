//! Block values: a metatile id plus its collision attributes

use serde::{Deserialize, Serialize};

/// A metatile id as stored in a grid buffer
pub type MetatileId = u16;

/// Sentinel returned when reading outside a grid
pub const INVALID_METATILE: MetatileId = 0xFFFF;

// Raw block layout (as written to blockdata files)
/// Mask for the metatile id bits of a raw block
pub const RAW_METATILE_MASK: u16 = 0x03FF;
/// Mask for the collision bits of a raw block
pub const RAW_COLLISION_MASK: u16 = 0x0C00;
/// Mask for the elevation bits of a raw block
pub const RAW_ELEVATION_MASK: u16 = 0xF000;
const RAW_COLLISION_SHIFT: u16 = 10;
const RAW_ELEVATION_SHIFT: u16 = 12;

/// Largest metatile id representable in a raw block
pub const MAX_RAW_METATILE: MetatileId = RAW_METATILE_MASK;

/// Collision and elevation of a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockAttributes {
    pub collision: u8,
    pub elevation: u8,
}

impl BlockAttributes {
    pub fn new(collision: u8, elevation: u8) -> Self {
        Self {
            collision,
            elevation,
        }
    }
}

/// One cell of a grid, read as a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub metatile_id: MetatileId,
    #[serde(flatten)]
    pub attributes: BlockAttributes,
}

impl Block {
    /// Create a block with default (passable, ground level) attributes
    pub fn new(metatile_id: MetatileId) -> Self {
        Self {
            metatile_id,
            attributes: BlockAttributes::default(),
        }
    }

    /// Create a block with explicit attributes
    pub fn with_attributes(metatile_id: MetatileId, collision: u8, elevation: u8) -> Self {
        Self {
            metatile_id,
            attributes: BlockAttributes::new(collision, elevation),
        }
    }

    /// Pack into the raw 16-bit blockdata representation.
    ///
    /// Bits that do not fit their field are dropped.
    #[inline]
    pub fn to_raw(self) -> u16 {
        (self.metatile_id & RAW_METATILE_MASK)
            | ((u16::from(self.attributes.collision) << RAW_COLLISION_SHIFT) & RAW_COLLISION_MASK)
            | ((u16::from(self.attributes.elevation) << RAW_ELEVATION_SHIFT) & RAW_ELEVATION_MASK)
    }

    /// Unpack from the raw 16-bit blockdata representation
    #[inline]
    pub fn from_raw(raw: u16) -> Self {
        Self {
            metatile_id: raw & RAW_METATILE_MASK,
            attributes: BlockAttributes {
                collision: ((raw & RAW_COLLISION_MASK) >> RAW_COLLISION_SHIFT) as u8,
                elevation: ((raw & RAW_ELEVATION_MASK) >> RAW_ELEVATION_SHIFT) as u8,
            },
        }
    }
}
