//! Tileset metadata used to validate brushes before they are stamped

use crate::block::MetatileId;
use crate::selection::{PatternError, SelectionPattern};
use serde::{Deserialize, Serialize};

/// Default number of metatile slots reserved for the primary tileset
pub const DEFAULT_MAX_PRIMARY_METATILES: u16 = 0x200;

/// Supplies the range of metatile ids a layout can reference
pub trait MetatileProvider {
    fn is_valid_metatile(&self, metatile_id: MetatileId) -> bool;
}

/// The primary/secondary tileset pair a layout draws from.
///
/// Primary metatiles occupy ids `0..primary_count`; secondary metatiles
/// start at `max_primary`, leaving the unused tail of the primary range
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetPair {
    pub primary_label: String,
    pub secondary_label: String,
    pub primary_count: u16,
    pub secondary_count: u16,
    #[serde(default = "default_max_primary")]
    pub max_primary: u16,
}

fn default_max_primary() -> u16 {
    DEFAULT_MAX_PRIMARY_METATILES
}

impl TilesetPair {
    pub fn new(
        primary_label: impl Into<String>,
        primary_count: u16,
        secondary_label: impl Into<String>,
        secondary_count: u16,
    ) -> Self {
        Self {
            primary_label: primary_label.into(),
            secondary_label: secondary_label.into(),
            primary_count,
            secondary_count,
            max_primary: DEFAULT_MAX_PRIMARY_METATILES,
        }
    }

    /// Total number of usable metatiles
    pub fn num_metatiles(&self) -> u32 {
        u32::from(self.primary_count) + u32::from(self.secondary_count)
    }
}

impl Default for TilesetPair {
    fn default() -> Self {
        Self::new(
            "gTileset_General",
            DEFAULT_MAX_PRIMARY_METATILES,
            "gTileset_Petalburg",
            DEFAULT_MAX_PRIMARY_METATILES,
        )
    }
}

impl MetatileProvider for TilesetPair {
    fn is_valid_metatile(&self, metatile_id: MetatileId) -> bool {
        if metatile_id < self.primary_count.min(self.max_primary) {
            return true;
        }
        let secondary_end = u32::from(self.max_primary) + u32::from(self.secondary_count);
        metatile_id >= self.max_primary && u32::from(metatile_id) < secondary_end
    }
}

/// Reject a brush that references metatiles the provider doesn't have
pub fn validate_pattern(
    pattern: &SelectionPattern,
    provider: &impl MetatileProvider,
) -> Result<(), PatternError> {
    pattern
        .items()
        .iter()
        .filter(|item| item.enabled)
        .find(|item| !provider.is_valid_metatile(item.metatile_id))
        .map_or(Ok(()), |item| Err(PatternError::InvalidMetatile(item.metatile_id)))
}
