//! Editor preferences
//!
//! Settings are passed explicitly to the editor session; nothing reads them
//! from global state.

mod file;

pub use file::PreferencesError;

use crate::tools::ShiftEdge;
use blockmap_core::{Block, LayoutError, TilesetPair};
use serde::{Deserialize, Serialize};

/// Extra columns and rows the game loads around a map
const MAP_DATA_PADDING: (u64, u64) = (15, 14);

/// Defaults applied to newly created layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewLayoutSettings {
    pub width: u32,
    pub height: u32,
    pub border_width: u32,
    pub border_height: u32,
    /// Metatile every cell of a new layout starts as
    pub fill_metatile: u16,
    pub tilesets: TilesetPair,
}

impl Default for NewLayoutSettings {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            border_width: 2,
            border_height: 2,
            fill_metatile: 0,
            tilesets: TilesetPair::default(),
        }
    }
}

impl NewLayoutSettings {
    pub fn fill_block(&self) -> Block {
        Block::new(self.fill_metatile)
    }
}

/// User preferences for the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
#[serde(default)]
pub struct EditorPreferences {
    pub new_layout: NewLayoutSettings,
    /// Commands kept per layout history (0 = unlimited)
    pub undo_limit: usize,
    /// Upper bound for `(width + 15) * (height + 14)`
    pub max_map_data_size: u64,
    pub max_border_width: u32,
    pub max_border_height: u32,
    pub shift_edge: ShiftEdge,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            new_layout: NewLayoutSettings::default(),
            undo_limit: 0,
            max_map_data_size: 10240,
            max_border_width: 255,
            max_border_height: 255,
            shift_edge: ShiftEdge::Keep,
        }
    }
}

/// Map data a layout of the given size occupies once loaded
pub fn map_data_size(width: u32, height: u32) -> u64 {
    (u64::from(width) + MAP_DATA_PADDING.0) * (u64::from(height) + MAP_DATA_PADDING.1)
}

impl EditorPreferences {
    /// Check map and border dimensions against the configured limits
    pub fn check_dimensions(
        &self,
        width: u32,
        height: u32,
        border_width: u32,
        border_height: u32,
    ) -> Result<(), LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptyDimensions { width, height });
        }
        if border_width == 0 || border_height == 0 {
            return Err(LayoutError::EmptyDimensions {
                width: border_width,
                height: border_height,
            });
        }

        let size = map_data_size(width, height);
        if size > self.max_map_data_size {
            return Err(LayoutError::MapTooLarge {
                width,
                height,
                size,
                max: self.max_map_data_size,
            });
        }

        if border_width > self.max_border_width || border_height > self.max_border_height {
            return Err(LayoutError::BorderTooLarge {
                width: border_width,
                height: border_height,
                max: self.max_border_width.max(self.max_border_height),
            });
        }
        Ok(())
    }
}
