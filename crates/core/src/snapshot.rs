//! Snapshots - plain-data copies of the board and the session
//!
//! [`BoardSnapshot`] is taken at every lock and is where outgoing garbage
//! rows come from. [`GameSnapshot`] is the serializable view handed to
//! renderers and the network.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::placement::Placement;
use crate::types::{
    Cell, ItemKind, PieceKind, Rotation, Row, SpecialKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_ZONE,
    CLEAR_MARK, EMPTY, GARBAGE_COLOR, NEXT_QUEUE_SIZE,
};

/// Copy of the visible grid taken when a piece locks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    rows: [Row; BOARD_HEIGHT],
}

impl BoardSnapshot {
    pub fn capture(board: &Board) -> Self {
        let mut rows = [[EMPTY; BOARD_WIDTH]; BOARD_HEIGHT];
        for (out, row) in rows.iter_mut().zip(board.visible_rows()) {
            out.copy_from_slice(row);
        }
        Self { rows }
    }

    /// Color at a visible (row, col); 0 when out of range
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(EMPTY)
    }

    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    /// The requested visible rows as garbage: occupied cells turn gray,
    /// marks and empty cells stay empty. Out-of-range indices are skipped.
    pub fn lines(&self, indices: &[usize]) -> Vec<Row> {
        indices
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .map(|row| {
                row.map(|c| match c {
                    EMPTY | CLEAR_MARK => EMPTY,
                    _ => GARBAGE_COLOR,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub item: ItemKind,
    pub item_block: Option<u8>,
    pub special: SpecialKind,
}

impl From<Placement> for ActiveSnapshot {
    fn from(value: Placement) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            item: value.item(),
            item_block: value.item_block_index(),
            special: value.special(),
        }
    }
}

/// Plain-data view of one engine for rendering and transmission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Packed visible board with the ghost projection and active piece drawn in
    pub board: [[u32; BOARD_WIDTH]; BOARD_HEIGHT],
    pub active: Option<ActiveSnapshot>,
    /// Board row of the ghost's bounding box, if a piece is active
    pub ghost_y: Option<i8>,
    pub hold: Option<ActiveSnapshot>,
    pub next_queue: [PieceKind; NEXT_QUEUE_SIZE],
    pub can_hold: bool,
    pub game_over: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pieces_locked: u32,
    pub seed: u32,
    /// Countdown left in a time-limited game
    pub remaining_time_ms: Option<u64>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0; BOARD_WIDTH]; BOARD_HEIGHT],
            active: None,
            ghost_y: None,
            hold: None,
            next_queue: [PieceKind::I; NEXT_QUEUE_SIZE],
            can_hold: true,
            game_over: false,
            score: 0,
            level: 1,
            lines: 0,
            pieces_locked: 0,
            seed: 0,
            remaining_time_ms: None,
        }
    }
}

/// Visible-row index of a board row, `None` inside the buffer zone
pub fn visible_row(y: i32) -> Option<usize> {
    let v = y - BUFFER_ZONE as i32;
    (0..BOARD_HEIGHT as i32).contains(&v).then_some(v as usize)
}
