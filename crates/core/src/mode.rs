//! Mode rules - what differs between normal and item games
//!
//! The engine is the same for every mode. It asks its [`ModeRules`] which
//! piece to spawn next and how to resolve clears after a lock; item games
//! also sequence the weight's removal through here, and time-limited games
//! keep their countdown here.

use arrayvec::ArrayVec;
use log::debug;

use crate::board::RowList;
use crate::item_board::ItemBoard;
use crate::placement::{Placement, WEIGHT_WIDTH};
use crate::rng::{PieceQueue, SimpleRng};
use crate::snapshot::visible_row;
use crate::types::{
    GameMode, ItemKind, BOARD_HEIGHT, LINES_PER_ITEM, TIME_LIMIT_MS, TOTAL_HEIGHT,
};

/// What one clear resolution marked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Rows marked by the line pass
    pub lines: usize,
    /// Of those, ordinary full rows
    pub normal_lines: usize,
    pub columns: usize,
    pub crosses: usize,
    /// Board rows marked by the line pass, bottom to top
    pub line_rows: RowList,
}

impl ClearOutcome {
    /// Clears that score
    pub fn total(&self) -> usize {
        self.lines + self.columns + self.crosses
    }

    /// Visible indices of the rows the line pass marked, top to bottom
    pub fn visible_line_rows(&self) -> ArrayVec<usize, BOARD_HEIGHT> {
        let mut rows: ArrayVec<usize, BOARD_HEIGHT> = self
            .line_rows
            .iter()
            .filter_map(|&y| visible_row(y as i32))
            .collect();
        rows.sort_unstable();
        rows
    }
}

/// Weight footprint being removed one row per drop tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WeightDrop {
    col: i32,
    row: i32,
    rows_left: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRules {
    lines_since_item: u32,
    pending: Option<ItemKind>,
    weight: Option<WeightDrop>,
}

/// Countdown driven by the engine clock
///
/// Only time passed to [`TimeLimit::advance`] counts, so a paused game loop
/// (or a paused timer) loses nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimit {
    duration_ms: u64,
    remaining_ms: u64,
    paused: bool,
}

impl TimeLimit {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            paused: false,
        }
    }

    /// Count down by `dt_ms`; returns true when this step ran the clock out
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        if self.paused || self.remaining_ms == 0 {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
        self.remaining_ms == 0
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_time_up(&self) -> bool {
        self.remaining_ms == 0
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self::new(TIME_LIMIT_MS)
    }
}

/// Piece-generation and clear-resolution strategy for one game mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeRules {
    Normal,
    Item(ItemRules),
    TimeLimited(TimeLimit),
}

impl ModeRules {
    pub fn new(mode: GameMode) -> Self {
        match mode {
            GameMode::Normal => ModeRules::Normal,
            GameMode::Item => ModeRules::Item(ItemRules::default()),
            GameMode::TimeLimited => ModeRules::TimeLimited(TimeLimit::default()),
        }
    }

    /// Time-limited rules with a custom duration
    pub fn time_limited(duration_ms: u64) -> Self {
        ModeRules::TimeLimited(TimeLimit::new(duration_ms))
    }

    pub fn mode(&self) -> GameMode {
        match self {
            ModeRules::Normal => GameMode::Normal,
            ModeRules::Item(_) => GameMode::Item,
            ModeRules::TimeLimited(_) => GameMode::TimeLimited,
        }
    }

    pub fn time_limit(&self) -> Option<&TimeLimit> {
        match self {
            ModeRules::TimeLimited(limit) => Some(limit),
            _ => None,
        }
    }

    pub fn time_limit_mut(&mut self) -> Option<&mut TimeLimit> {
        match self {
            ModeRules::TimeLimited(limit) => Some(limit),
            _ => None,
        }
    }

    /// Run the countdown, if any; returns true when time just ran out
    pub fn advance_clock(&mut self, dt_ms: u64) -> bool {
        self.time_limit_mut()
            .is_some_and(|limit| limit.advance(dt_ms))
    }

    /// Mark whatever the last lock completed
    pub fn resolve_clears(&self, board: &mut ItemBoard, now_ms: u64) -> ClearOutcome {
        match self {
            ModeRules::Normal | ModeRules::TimeLimited(_) => {
                let line_rows = board.mark_full_lines(now_ms);
                ClearOutcome {
                    lines: line_rows.len(),
                    normal_lines: line_rows.len(),
                    line_rows,
                    ..ClearOutcome::default()
                }
            }
            ModeRules::Item(_) => {
                let result = board.resolve_item_clears(now_ms);
                ClearOutcome {
                    lines: result.lines,
                    normal_lines: result.normal_lines(),
                    columns: result.columns,
                    crosses: result.crosses,
                    line_rows: result.line_rows,
                }
            }
        }
    }

    /// Count ordinary line clears toward the next item piece
    pub fn record_clears(&mut self, outcome: &ClearOutcome, rng: &mut SimpleRng) {
        let ModeRules::Item(rules) = self else {
            return;
        };
        rules.lines_since_item += outcome.normal_lines as u32;
        while rules.lines_since_item >= LINES_PER_ITEM {
            rules.lines_since_item -= LINES_PER_ITEM;
            if rules.pending.is_none() {
                let pick = rng.next_range(ItemKind::GENERATED.len() as u32) as usize;
                let item = ItemKind::GENERATED[pick];
                debug!("next spawn is an item piece: {item:?}");
                rules.pending = Some(item);
            }
        }
    }

    /// Next piece to spawn: a pending item piece first, otherwise the queue
    pub fn take_next_piece(&mut self, queue: &mut PieceQueue) -> Placement {
        let pending = match self {
            ModeRules::Item(rules) => rules.pending.take(),
            ModeRules::Normal | ModeRules::TimeLimited(_) => None,
        };
        match pending {
            Some(item) => match Placement::spawn_special(item) {
                Some(special) => special,
                None => {
                    let piece = queue.draw();
                    let block = queue.rng_mut().next_range(piece.block_count() as u32) as u8;
                    piece.with_item(block, item).unwrap_or(piece)
                }
            },
            None => queue.draw(),
        }
    }

    /// Whether an item piece will be the next spawn
    pub fn has_pending_item(&self) -> bool {
        matches!(self, ModeRules::Item(rules) if rules.pending.is_some())
    }

    pub fn lines_since_item(&self) -> u32 {
        match self {
            ModeRules::Item(rules) => rules.lines_since_item,
            ModeRules::Normal | ModeRules::TimeLimited(_) => 0,
        }
    }

    /// Start removing a weight that now rests on the floor at `col`
    pub fn begin_weight(&mut self, col: i32, height: u8) {
        if let ModeRules::Item(rules) = self {
            rules.weight = Some(WeightDrop {
                col,
                row: TOTAL_HEIGHT as i32 - i32::from(height),
                rows_left: height,
            });
        }
    }

    pub fn weight_active(&self) -> bool {
        matches!(self, ModeRules::Item(rules) if rules.weight.is_some())
    }

    /// Remove one footprint row; returns `Some(true)` once the weight is gone
    /// and `None` when no weight is active
    pub fn step_weight(&mut self, board: &mut ItemBoard) -> Option<bool> {
        let ModeRules::Item(rules) = self else {
            return None;
        };
        let weight = rules.weight.as_mut()?;
        board.clear_weight_step(weight.row, weight.col, WEIGHT_WIDTH as i32);
        weight.row += 1;
        weight.rows_left -= 1;
        if weight.rows_left == 0 {
            rules.weight = None;
            return Some(true);
        }
        Some(false)
    }

    /// Garbage pushed the board up by `rows`
    pub fn shift_weight(&mut self, rows: usize) {
        if let ModeRules::Item(ItemRules {
            weight: Some(weight),
            ..
        }) = self
        {
            weight.row -= rows as i32;
        }
    }

    /// Back to a fresh game; a time limit keeps its duration
    pub fn reset(&mut self) {
        let fresh = match self.time_limit() {
            Some(limit) => ModeRules::time_limited(limit.duration_ms()),
            None => ModeRules::new(self.mode()),
        };
        *self = fresh;
    }
}
