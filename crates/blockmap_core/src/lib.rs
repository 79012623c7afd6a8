//! Core data structures for the blockmap editor
//!
//! This crate provides the fundamental types for representing metatile maps:
//! - `GridBuffer` - Row-major blockdata with parallel collision attributes
//! - `Snapshot` - Immutable copy of a grid used by undo history
//! - `SelectionPattern` - The brush stamped by paint tools
//! - `TilesetPair` - Valid metatile id ranges for a layout
//! - `Layout` / `Layouts` - Owners of the blockdata and border grids

mod block;
mod grid;
mod layout;
mod selection;
mod tileset;

pub use block::{
    Block, BlockAttributes, MetatileId, INVALID_METATILE, MAX_RAW_METATILE, RAW_COLLISION_MASK,
    RAW_ELEVATION_MASK, RAW_METATILE_MASK,
};
pub use grid::{GridBuffer, GridError, Snapshot};
pub use layout::{GridRef, GridTarget, Layout, LayoutError, LayoutId, Layouts};
pub use selection::{PatternError, PatternItem, SelectionPattern};
pub use tileset::{validate_pattern, MetatileProvider, TilesetPair, DEFAULT_MAX_PRIMARY_METATILES};
