//! Selection patterns ("brushes") stamped by the paint tools

use crate::block::{Block, BlockAttributes, MetatileId};
use serde::{Deserialize, Serialize};

/// Errors raised when building or validating a selection pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Width or height is zero
    Empty,
    /// Item count does not match `width * height`
    ItemCount {
        width: u32,
        height: u32,
        len: usize,
    },
    /// Collision list is present but does not match the item count
    CollisionCount { expected: usize, found: usize },
    /// A metatile id is not valid for the target tilesets
    InvalidMetatile(MetatileId),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::Empty => write!(f, "Selection pattern is empty"),
            PatternError::ItemCount { width, height, len } => write!(
                f,
                "Selection pattern of {}x{} needs {} items, got {}",
                width,
                height,
                *width as usize * *height as usize,
                len
            ),
            PatternError::CollisionCount { expected, found } => write!(
                f,
                "Selection pattern has {} collision items, expected {}",
                found, expected
            ),
            PatternError::InvalidMetatile(id) => {
                write!(f, "Metatile id 0x{:03X} is not in the loaded tilesets", id)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// One cell of a selection pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternItem {
    pub metatile_id: MetatileId,
    /// Disabled items are skipped when stamping
    pub enabled: bool,
}

impl PatternItem {
    pub fn new(metatile_id: MetatileId) -> Self {
        Self {
            metatile_id,
            enabled: true,
        }
    }

    pub fn disabled(metatile_id: MetatileId) -> Self {
        Self {
            metatile_id,
            enabled: false,
        }
    }
}

/// Serialized form of a pattern; validated on the way back in
#[derive(Serialize, Deserialize)]
struct PatternData {
    width: u32,
    height: u32,
    items: Vec<PatternItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collisions: Option<Vec<BlockAttributes>>,
}

/// A rectangular block of metatiles (and optionally collisions) used as a brush
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatternData", into = "PatternData")]
pub struct SelectionPattern {
    width: u32,
    height: u32,
    items: Vec<PatternItem>,
    collisions: Option<Vec<BlockAttributes>>,
}

impl TryFrom<PatternData> for SelectionPattern {
    type Error = PatternError;

    fn try_from(data: PatternData) -> Result<Self, Self::Error> {
        let pattern = Self::from_items(data.width, data.height, data.items)?;
        match data.collisions {
            Some(collisions) => pattern.with_collisions(collisions),
            None => Ok(pattern),
        }
    }
}

impl From<SelectionPattern> for PatternData {
    fn from(pattern: SelectionPattern) -> Self {
        Self {
            width: pattern.width,
            height: pattern.height,
            items: pattern.items,
            collisions: pattern.collisions,
        }
    }
}

/// A single metatile 0 brush
impl Default for SelectionPattern {
    fn default() -> Self {
        Self::single(0)
    }
}

impl SelectionPattern {
    /// A 1x1 brush
    pub fn single(metatile_id: MetatileId) -> Self {
        Self {
            width: 1,
            height: 1,
            items: vec![PatternItem::new(metatile_id)],
            collisions: None,
        }
    }

    /// A brush of enabled metatiles, row-major
    pub fn new(width: u32, height: u32, metatile_ids: &[MetatileId]) -> Result<Self, PatternError> {
        let items = metatile_ids.iter().copied().map(PatternItem::new).collect();
        Self::from_items(width, height, items)
    }

    /// A brush from explicit items, row-major
    pub fn from_items(
        width: u32,
        height: u32,
        items: Vec<PatternItem>,
    ) -> Result<Self, PatternError> {
        if width == 0 || height == 0 {
            return Err(PatternError::Empty);
        }
        if items.len() != width as usize * height as usize {
            return Err(PatternError::ItemCount {
                width,
                height,
                len: items.len(),
            });
        }
        Ok(Self {
            width,
            height,
            items,
            collisions: None,
        })
    }

    /// Attach collision attributes, one per item
    pub fn with_collisions(
        mut self,
        collisions: Vec<BlockAttributes>,
    ) -> Result<Self, PatternError> {
        if collisions.len() != self.items.len() {
            return Err(PatternError::CollisionCount {
                expected: self.items.len(),
                found: collisions.len(),
            });
        }
        self.collisions = Some(collisions);
        Ok(self)
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

    pub fn items(&self) -> &[PatternItem] {
        &self.items
    }

    pub fn collisions(&self) -> Option<&[BlockAttributes]> {
        self.collisions.as_deref()
    }

    /// Whether this is a 1x1 brush
    pub fn is_single(&self) -> bool {
        self.items.len() == 1
    }

    /// The top-left item
    pub fn anchor(&self) -> PatternItem {
        self.items[0]
    }

    /// Item index for an offset from the fill origin, tiling the pattern
    /// in both directions (negative offsets wrap).
    #[inline]
    pub fn tiled_index(&self, dx: i32, dy: i32) -> usize {
        let i = dx.rem_euclid(self.width as i32) as usize;
        let j = dy.rem_euclid(self.height as i32) as usize;
        j * self.width as usize + i
    }

    /// Item at a linear index
    pub fn item(&self, index: usize) -> Option<PatternItem> {
        self.items.get(index).copied()
    }

    /// Apply item `index` to `block`, returning `None` if the item is disabled.
    ///
    /// Collision attributes are only written when the pattern carries one
    /// per item.
    pub fn stamp(&self, index: usize, block: Block) -> Option<Block> {
        let item = self.items.get(index)?;
        if !item.enabled {
            return None;
        }
        let mut block = block;
        block.metatile_id = item.metatile_id;
        if let Some(collisions) = self.collisions() {
            if collisions.len() == self.items.len() {
                block.attributes = collisions[index];
            }
        }
        Some(block)
    }

    /// Whether any item of the pattern uses this metatile id
    pub fn contains_metatile(&self, metatile_id: MetatileId) -> bool {
        self.items.iter().any(|item| item.metatile_id == metatile_id)
    }

    /// Every metatile id in the pattern, row-major
    pub fn metatile_ids(&self) -> impl Iterator<Item = MetatileId> + '_ {
        self.items.iter().map(|item| item.metatile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_validation() {
        assert_eq!(SelectionPattern::new(0, 1, &[]), Err(PatternError::Empty));
        assert_eq!(
            SelectionPattern::new(2, 2, &[1, 2, 3]),
            Err(PatternError::ItemCount {
                width: 2,
                height: 2,
                len: 3
            })
        );

        let pattern = SelectionPattern::new(2, 1, &[1, 2]).unwrap();
        assert_eq!(
            pattern.clone().with_collisions(vec![BlockAttributes::default()]),
            Err(PatternError::CollisionCount {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_tiled_index_wraps_negative_offsets() {
        let pattern = SelectionPattern::new(2, 3, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(pattern.tiled_index(0, 0), 0);
        assert_eq!(pattern.tiled_index(1, 2), 5);
        assert_eq!(pattern.tiled_index(2, 3), 0);
        assert_eq!(pattern.tiled_index(-1, 0), 1);
        assert_eq!(pattern.tiled_index(-1, -1), 5);
    }

    #[test]
    fn test_stamp() {
        let pattern = SelectionPattern::from_items(
            2,
            1,
            vec![PatternItem::new(7), PatternItem::disabled(8)],
        )
        .unwrap()
        .with_collisions(vec![BlockAttributes::new(1, 3), BlockAttributes::new(0, 0)])
        .unwrap();

        let base = Block::with_attributes(2, 0, 0);
        assert_eq!(pattern.stamp(0, base), Some(Block::with_attributes(7, 1, 3)));
        assert_eq!(pattern.stamp(1, base), None);

        // Without collisions the attributes are untouched
        let plain = SelectionPattern::single(4);
        let attributed = Block::with_attributes(2, 1, 1);
        assert_eq!(
            plain.stamp(0, attributed),
            Some(Block::with_attributes(4, 1, 1))
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let zero_width = r#"{"width":0,"height":1,"items":[{"metatile_id":2,"enabled":true}]}"#;
        assert!(serde_json::from_str::<SelectionPattern>(zero_width).is_err());

        let no_items = r#"{"width":1,"height":1,"items":[]}"#;
        assert!(serde_json::from_str::<SelectionPattern>(no_items).is_err());

        let short_collisions = r#"{"width":2,"height":1,
            "items":[{"metatile_id":1,"enabled":true},{"metatile_id":2,"enabled":true}],
            "collisions":[{"collision":1,"elevation":3}]}"#;
        assert!(serde_json::from_str::<SelectionPattern>(short_collisions).is_err());

        let pattern = SelectionPattern::new(2, 1, &[1, 2])
            .unwrap()
            .with_collisions(vec![BlockAttributes::new(1, 3); 2])
            .unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(serde_json::from_str::<SelectionPattern>(&json).unwrap(), pattern);
    }
}
