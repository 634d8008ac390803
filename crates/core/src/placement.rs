//! Piece placement - a positioned piece with optional item or special kind
//!
//! A placement is a small `Copy` value: movement and rotation produce new
//! placements instead of mutating shared state. Ordinary pieces take their
//! blocks from the catalog; weight and bomb pieces carry their own fixed
//! footprint and never rotate.

use arrayvec::ArrayVec;

use crate::pieces::{get_shape, spawn_y_for, MinoOffset, SPAWN_X};
use crate::types::{Cell, ItemKind, PieceKind, Rotation, SpecialKind};

/// Largest block count of any piece (the weight has six)
pub const MAX_BLOCKS: usize = 6;

/// Block offsets of a placement, in stable block order
pub type BlockOffsets = ArrayVec<MinoOffset, MAX_BLOCKS>;

/// `.XX.` over `XXXX`
pub const WEIGHT_OFFSETS: [MinoOffset; 6] = [(1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (3, 1)];

/// 2x2 block
pub const BOMB_OFFSETS: [MinoOffset; 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Width of the weight footprint in columns
pub const WEIGHT_WIDTH: usize = 4;

/// Catalog kind whose color a weight piece is drawn with
pub const WEIGHT_KIND: PieceKind = PieceKind::I;

/// Catalog kind whose color a bomb piece is drawn with
pub const BOMB_KIND: PieceKind = PieceKind::O;

/// An item attached to one physical block of an ordinary piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemAttachment {
    pub block: u8,
    pub item: ItemKind,
}

/// One absolute block of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub x: i8,
    pub y: i8,
    pub item: ItemKind,
}

/// A piece at a position and rotation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
    item: Option<ItemAttachment>,
    special: SpecialKind,
}

impl Placement {
    pub fn new(kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> Self {
        Self {
            kind,
            x,
            y,
            rotation,
            item: None,
            special: SpecialKind::None,
        }
    }

    /// Fresh piece at the top-center of the buffer zone
    pub fn spawn(kind: PieceKind) -> Self {
        let mut piece = Self::new(kind, SPAWN_X, 0, Rotation::North);
        piece.y = spawn_y_for(&piece.offsets());
        piece
    }

    /// Weight piece at the given position
    pub fn weight(x: i8, y: i8) -> Self {
        Self {
            special: SpecialKind::Weight,
            ..Self::new(WEIGHT_KIND, x, y, Rotation::North)
        }
    }

    /// Bomb piece at the given position
    pub fn bomb(x: i8, y: i8) -> Self {
        Self {
            special: SpecialKind::Bomb,
            ..Self::new(BOMB_KIND, x, y, Rotation::North)
        }
    }

    /// Spawned special piece for an item kind, `None` for block items
    pub fn spawn_special(item: ItemKind) -> Option<Self> {
        let piece = match item {
            ItemKind::Weight => Self::weight(SPAWN_X, 0),
            ItemKind::Bomb => Self::bomb(SPAWN_X + 1, 0),
            _ => return None,
        };
        Some(piece.at_spawn())
    }

    /// Same piece moved back to its spawn position in rotation 0
    ///
    /// The item attachment (and special kind) is kept.
    pub fn at_spawn(self) -> Self {
        let x = match self.special {
            SpecialKind::Bomb => SPAWN_X + 1,
            _ => SPAWN_X,
        };
        let mut piece = Self {
            x,
            rotation: Rotation::North,
            ..self
        };
        piece.y = spawn_y_for(&piece.offsets());
        piece
    }

    /// Attach `item` to the block with the given index
    ///
    /// Returns `None` when the index is out of range, the item is not a
    /// block item, or the piece is a special piece.
    pub fn with_item(self, block: u8, item: ItemKind) -> Option<Self> {
        if self.special != SpecialKind::None
            || !item.is_block_item()
            || usize::from(block) >= self.block_count()
        {
            return None;
        }
        Some(Self {
            item: Some(ItemAttachment { block, item }),
            ..self
        })
    }

    pub fn item(&self) -> ItemKind {
        match self.special {
            SpecialKind::None => self.item.map_or(ItemKind::None, |a| a.item),
            special => special.item(),
        }
    }

    pub fn item_block_index(&self) -> Option<u8> {
        self.item.map(|a| a.block)
    }

    pub fn special(&self) -> SpecialKind {
        self.special
    }

    pub fn is_rotation_locked(&self) -> bool {
        self.special.is_rotation_locked()
    }

    pub fn is_holdable(&self) -> bool {
        !self.is_rotation_locked()
    }

    pub fn block_count(&self) -> usize {
        match self.special {
            SpecialKind::None => 4,
            SpecialKind::Weight => WEIGHT_OFFSETS.len(),
            SpecialKind::Bomb => BOMB_OFFSETS.len(),
        }
    }

    /// Block offsets relative to the piece position
    pub fn offsets(&self) -> BlockOffsets {
        match self.special {
            SpecialKind::None => get_shape(self.kind, self.rotation).into_iter().collect(),
            SpecialKind::Weight => WEIGHT_OFFSETS.into_iter().collect(),
            SpecialKind::Bomb => BOMB_OFFSETS.into_iter().collect(),
        }
    }

    /// Absolute (x, y) board coordinates of every block
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let (x, y) = (self.x, self.y);
        self.offsets().into_iter().map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// Absolute blocks with their item symbols
    pub fn blocks(&self) -> ArrayVec<Block, MAX_BLOCKS> {
        self.offsets()
            .into_iter()
            .enumerate()
            .map(|(i, (dx, dy))| Block {
                x: self.x + dx,
                y: self.y + dy,
                item: self.item_for_block(i),
            })
            .collect()
    }

    /// Item symbol carried by the block at `index`
    pub fn item_for_block(&self, index: usize) -> ItemKind {
        match (self.special, self.item) {
            (SpecialKind::None, Some(a)) if usize::from(a.block) == index => a.item,
            (SpecialKind::None, _) => ItemKind::None,
            (special, _) => special.item(),
        }
    }

    /// Board color written for this piece
    pub fn color(&self) -> Cell {
        self.kind.color_index()
    }

    pub fn translated(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Same position, next rotation state; rotation-locked pieces are unchanged
    pub fn rotated(self, clockwise: bool) -> Self {
        if self.is_rotation_locked() {
            return self;
        }
        let rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        Self { rotation, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_top_center_in_buffer() {
        let piece = Placement::spawn(PieceKind::T);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.rotation, Rotation::North);
        assert!(piece.cells().all(|(_, y)| y < 4));
        assert!(piece.cells().any(|(_, y)| y == 3));
    }

    #[test]
    fn item_follows_the_same_block_through_rotation() {
        let piece = Placement::new(PieceKind::L, 3, 5, Rotation::North)
            .with_item(0, ItemKind::LineClear)
            .unwrap();
        let mut current = piece;
        for _ in 0..4 {
            let carrying: Vec<Block> = current
                .blocks()
                .into_iter()
                .filter(|b| b.item.is_some())
                .collect();
            assert_eq!(carrying.len(), 1);
            current = current.rotated(true);
        }
        assert_eq!(current, piece);
    }

    #[test]
    fn with_item_rejects_bad_input() {
        let piece = Placement::spawn(PieceKind::S);
        assert!(piece.with_item(4, ItemKind::LineClear).is_none());
        assert!(piece.with_item(0, ItemKind::Weight).is_none());
        assert!(Placement::bomb(0, 0).with_item(0, ItemKind::CrossClear).is_none());
    }

    #[test]
    fn special_pieces_do_not_rotate() {
        let weight = Placement::weight(2, 10);
        assert_eq!(weight.rotated(true), weight);
        assert_eq!(weight.block_count(), 6);
        assert!(!weight.is_holdable());
        assert!(weight.blocks().iter().all(|b| b.item == ItemKind::Weight));

        let bomb = Placement::bomb(4, 10);
        assert_eq!(bomb.rotated(false), bomb);
        assert!(bomb.blocks().iter().all(|b| b.item == ItemKind::Bomb));
    }

    #[test]
    fn at_spawn_keeps_the_item() {
        let piece = Placement::new(PieceKind::J, 0, 15, Rotation::South)
            .with_item(2, ItemKind::CrossClear)
            .unwrap();
        let reset = piece.at_spawn();
        assert_eq!(reset.rotation, Rotation::North);
        assert_eq!(reset.x, 3);
        assert_eq!(reset.item(), ItemKind::CrossClear);
        assert_eq!(reset.item_block_index(), Some(2));
    }
}
